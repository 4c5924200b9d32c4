#![allow(dead_code)]

pub mod osf_server;

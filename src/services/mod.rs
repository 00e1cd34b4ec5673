//! 服务层模块

pub mod doc_writer;

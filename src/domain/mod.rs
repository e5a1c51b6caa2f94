//! Domain Layer - 领域层
//!
//! - Site Context: 站点与应用程序池配置
//! - 目录名整理

pub mod site;

mod folder_name;

pub use folder_name::correct_folder_name;

//! Server Queries

/// 查询服务器主版本号
#[derive(Debug, Clone)]
pub struct GetServerVersion;

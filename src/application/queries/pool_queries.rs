//! Application Pool Queries

/// 查询应用程序池状态
#[derive(Debug, Clone)]
pub struct GetPoolState {
    pub pool_name: String,
}

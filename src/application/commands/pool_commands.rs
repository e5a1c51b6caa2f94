//! Application Pool Commands

/// 启动应用程序池命令
#[derive(Debug, Clone)]
pub struct StartPool {
    pub pool_name: String,
}

/// 停止应用程序池命令
#[derive(Debug, Clone)]
pub struct StopPool {
    pub pool_name: String,
}

/// 回收应用程序池命令
#[derive(Debug, Clone)]
pub struct RecyclePool {
    pub pool_name: String,
}

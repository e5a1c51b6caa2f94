//! Site Context - Aggregate Root
//!
//! `ServerConfiguration` 是一次会话中读到的完整配置快照，
//! 所有修改都在快照上进行，再由存储端口整体提交。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{
    names_match, normalize_application_path, Binding, ObjectState, PipelineMode, SiteError,
};

/// 虚拟目录：URL 路径 -> 物理路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDirectory {
    pub path: String,
    pub physical_path: PathBuf,
}

/// 站点下的应用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub path: String,
    pub application_pool_name: String,
    pub virtual_directories: Vec<VirtualDirectory>,
}

impl Application {
    pub fn new(path: &str, physical_path: impl Into<PathBuf>, pool_name: impl Into<String>) -> Self {
        Self {
            path: normalize_application_path(path),
            application_pool_name: pool_name.into(),
            virtual_directories: vec![VirtualDirectory {
                path: "/".to_string(),
                physical_path: physical_path.into(),
            }],
        }
    }

    /// 根虚拟目录（路径为 `/`）
    pub fn root_virtual_directory(&self) -> Option<&VirtualDirectory> {
        self.virtual_directories.iter().find(|v| v.path == "/")
    }
}

/// 站点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub bindings: Vec<Binding>,
    pub applications: Vec<Application>,
    pub state: ObjectState,
    /// 新建应用默认使用的应用程序池
    pub default_application_pool: String,
}

impl Site {
    /// 第一个应用的第一个虚拟目录的物理路径
    pub fn primary_physical_path(&self) -> Option<&Path> {
        self.applications
            .first()
            .and_then(|app| app.virtual_directories.first())
            .map(|v| v.physical_path.as_path())
    }

    /// 绑定信息字符串，按绑定顺序
    pub fn binding_informations(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|b| b.information.to_string())
            .collect()
    }

    /// 按路径查找应用（忽略大小写）
    pub fn find_application(&self, path: &str) -> Option<&Application> {
        let path = normalize_application_path(path);
        self.applications.iter().find(|a| names_match(&a.path, &path))
    }

    /// 设置默认应用程序池，同时绑定根应用
    pub fn assign_application_pool(&mut self, pool_name: &str) {
        self.default_application_pool = pool_name.to_string();
        if let Some(root) = self.applications.iter_mut().find(|a| a.path == "/") {
            root.application_pool_name = pool_name.to_string();
        }
    }
}

/// 应用程序池
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPool {
    pub name: String,
    /// `None` 表示无托管代码
    pub managed_runtime_version: Option<String>,
    pub pipeline_mode: PipelineMode,
    pub state: ObjectState,
    pub last_recycled_at: Option<DateTime<Utc>>,
}

impl ApplicationPool {
    pub fn new(name: impl Into<String>, managed_runtime_version: Option<String>) -> Self {
        Self {
            name: name.into(),
            managed_runtime_version,
            pipeline_mode: PipelineMode::Integrated,
            state: ObjectState::Started,
            last_recycled_at: None,
        }
    }
}

/// 配置快照聚合根
///
/// 不变量:
/// - 通过 `add_site` 新建的站点名称忽略大小写唯一
/// - 应用程序池名称忽略大小写唯一
/// - 每个站点至少有一个绑定和一个根应用 `/`
/// - 站点 ID 单调递增，删除后不复用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfiguration {
    revision: u64,
    next_site_id: i64,
    sites: Vec<Site>,
    pools: Vec<ApplicationPool>,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self::new(0, Vec::new(), Vec::new())
    }
}

impl ServerConfiguration {
    pub fn new(revision: u64, sites: Vec<Site>, pools: Vec<ApplicationPool>) -> Self {
        let next_site_id = sites.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            revision,
            next_site_id,
            sites,
            pools,
        }
    }

    /// 恢复存储记录的 ID 计数器，不会低于现有站点的最大 ID
    pub fn with_next_site_id(mut self, next_site_id: i64) -> Self {
        self.next_site_id = self.next_site_id.max(next_site_id);
        self
    }

    /// 下一个新站点将获得的 ID
    pub fn next_site_id(&self) -> i64 {
        self.next_site_id
    }

    /// 读取快照时存储的版本号
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn pools(&self) -> &[ApplicationPool] {
        &self.pools
    }

    pub fn into_parts(self) -> (u64, Vec<Site>, Vec<ApplicationPool>) {
        (self.revision, self.sites, self.pools)
    }

    // ========== Sites ==========

    /// 按名称定位站点
    ///
    /// 大小写完全一致的站点优先；否则要求忽略大小写后只匹配一个，
    /// 匹配多个时返回 `AmbiguousSiteName`。
    fn site_index(&self, name: &str) -> Result<Option<usize>, SiteError> {
        if let Some(index) = self.sites.iter().position(|s| s.name == name) {
            return Ok(Some(index));
        }

        let matches: Vec<usize> = self
            .sites
            .iter()
            .enumerate()
            .filter(|(_, s)| names_match(&s.name, name))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [index] => Ok(Some(*index)),
            _ => Err(SiteError::AmbiguousSiteName {
                name: name.to_string(),
                count: matches.len(),
            }),
        }
    }

    pub fn find_site(&self, name: &str) -> Result<Option<&Site>, SiteError> {
        Ok(self.site_index(name)?.map(|i| &self.sites[i]))
    }

    pub fn find_site_mut(&mut self, name: &str) -> Result<Option<&mut Site>, SiteError> {
        Ok(self.site_index(name)?.map(move |i| &mut self.sites[i]))
    }

    fn require_site_mut(&mut self, name: &str) -> Result<&mut Site, SiteError> {
        self.find_site_mut(name)?
            .ok_or_else(|| SiteError::SiteNotFound(name.to_string()))
    }

    /// 新增站点，包含根应用 `/` 和根虚拟目录
    ///
    /// 若绑定与已启动站点冲突，新站点保持停止状态。
    pub fn add_site(
        &mut self,
        name: &str,
        binding: Binding,
        physical_path: impl Into<PathBuf>,
    ) -> Result<&mut Site, SiteError> {
        if self.sites.iter().any(|s| names_match(&s.name, name)) {
            return Err(SiteError::SiteAlreadyExists(name.to_string()));
        }

        let id = self.next_site_id;
        self.next_site_id += 1;
        let state = if self.started_site_using(&binding, None).is_some() {
            ObjectState::Stopped
        } else {
            ObjectState::Started
        };

        self.sites.push(Site {
            id,
            name: name.to_string(),
            bindings: vec![binding],
            applications: vec![Application::new("/", physical_path, "")],
            state,
            default_application_pool: String::new(),
        });

        let index = self.sites.len() - 1;
        Ok(&mut self.sites[index])
    }

    /// 删除站点，不存在时返回 `None`
    pub fn remove_site(&mut self, name: &str) -> Result<Option<Site>, SiteError> {
        Ok(self.site_index(name)?.map(|i| self.sites.remove(i)))
    }

    /// 已启动且与给定绑定冲突的其他站点
    fn started_site_using(&self, binding: &Binding, except_id: Option<i64>) -> Option<&Site> {
        self.sites.iter().find(|s| {
            Some(s.id) != except_id
                && s.state == ObjectState::Started
                && s.bindings.iter().any(|b| b.collides_with(binding))
        })
    }

    pub fn start_site(&mut self, name: &str) -> Result<(), SiteError> {
        let index = self
            .site_index(name)?
            .ok_or_else(|| SiteError::SiteNotFound(name.to_string()))?;
        let site = &self.sites[index];

        for binding in &site.bindings {
            if let Some(other) = self.started_site_using(binding, Some(site.id)) {
                return Err(SiteError::BindingInUse {
                    binding: binding.information.to_string(),
                    site: other.name.clone(),
                });
            }
        }

        self.sites[index].state = ObjectState::Started;
        Ok(())
    }

    pub fn stop_site(&mut self, name: &str) -> Result<(), SiteError> {
        self.require_site_mut(name)?.state = ObjectState::Stopped;
        Ok(())
    }

    /// 在站点下新增应用
    pub fn add_application(
        &mut self,
        site_name: &str,
        path: &str,
        physical_path: impl Into<PathBuf>,
    ) -> Result<&mut Application, SiteError> {
        let site = self.require_site_mut(site_name)?;
        let path = normalize_application_path(path);

        if site.find_application(&path).is_some() {
            return Err(SiteError::ApplicationAlreadyExists {
                site: site.name.clone(),
                path,
            });
        }

        let pool = site.default_application_pool.clone();
        site.applications
            .push(Application::new(&path, physical_path, pool));
        let index = site.applications.len() - 1;
        Ok(&mut site.applications[index])
    }

    // ========== Application Pools ==========

    pub fn find_pool(&self, name: &str) -> Option<&ApplicationPool> {
        self.pools.iter().find(|p| names_match(&p.name, name))
    }

    fn require_pool_mut(&mut self, name: &str) -> Result<&mut ApplicationPool, SiteError> {
        self.pools
            .iter_mut()
            .find(|p| names_match(&p.name, name))
            .ok_or_else(|| SiteError::PoolNotFound(name.to_string()))
    }

    pub fn add_pool(
        &mut self,
        name: &str,
        managed_runtime_version: Option<String>,
    ) -> Result<&mut ApplicationPool, SiteError> {
        if name.trim().is_empty() {
            return Err(SiteError::InvalidName("应用程序池名称不能为空".to_string()));
        }
        if self.find_pool(name).is_some() {
            return Err(SiteError::PoolAlreadyExists(name.to_string()));
        }
        self.pools
            .push(ApplicationPool::new(name, managed_runtime_version));
        let index = self.pools.len() - 1;
        Ok(&mut self.pools[index])
    }

    /// 不存在时创建应用程序池，返回是否新建
    pub fn ensure_pool(&mut self, name: &str, managed_runtime_version: Option<String>) -> Result<bool, SiteError> {
        if self.find_pool(name).is_some() {
            return Ok(false);
        }
        self.add_pool(name, managed_runtime_version)?;
        Ok(true)
    }

    pub fn remove_pool(&mut self, name: &str) -> Option<ApplicationPool> {
        let index = self.pools.iter().position(|p| names_match(&p.name, name))?;
        Some(self.pools.remove(index))
    }

    pub fn start_pool(&mut self, name: &str) -> Result<(), SiteError> {
        self.require_pool_mut(name)?.state = ObjectState::Started;
        Ok(())
    }

    pub fn stop_pool(&mut self, name: &str) -> Result<(), SiteError> {
        self.require_pool_mut(name)?.state = ObjectState::Stopped;
        Ok(())
    }

    /// 回收应用程序池，已停止的池不能回收
    pub fn recycle_pool(&mut self, name: &str, now: DateTime<Utc>) -> Result<(), SiteError> {
        let pool = self.require_pool_mut(name)?;
        if pool.state != ObjectState::Started {
            return Err(SiteError::InvalidState(format!(
                "应用程序池 {} 已停止，无法回收",
                pool.name
            )));
        }
        pool.last_recycled_at = Some(now);
        Ok(())
    }
}

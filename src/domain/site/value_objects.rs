//! Site Context - Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SiteError;

/// 约定的默认站点名称（比较时忽略大小写）
pub const CONVENTIONAL_DEFAULT_SITE_NAME: &str = "Default Web Site";

/// 忽略大小写比较两个名称
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// 是否为约定的默认站点名称
pub fn is_default_site_name(name: &str) -> bool {
    names_match(name, CONVENTIONAL_DEFAULT_SITE_NAME)
}

/// 站点名称
///
/// 不变量:
/// - 去除首尾空白后不能为空
/// - 不能包含 `/` 或 `\`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteName(String);

impl SiteName {
    pub fn parse(name: impl Into<String>) -> Result<Self, SiteError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(SiteError::InvalidName("站点名称不能为空".to_string()));
        }
        if name.chars().count() > 260 {
            return Err(SiteError::InvalidName(format!(
                "站点名称长度不能超过260字符: {}",
                name
            )));
        }
        if name.contains(['/', '\\']) {
            return Err(SiteError::InvalidName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SiteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 规范化应用路径：空串视为 `/`，缺少前导 `/` 时补上
pub fn normalize_application_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// 绑定协议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl FromStr for Protocol {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(SiteError::InvalidBinding(format!("未知协议: {}", other))),
        }
    }
}

/// 绑定信息 `{ip}:{port}:{host}`，例如 `*:8080:`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingInformation {
    ip: String,
    port: u16,
    host: String,
}

impl BindingInformation {
    pub fn new(ip: impl Into<String>, port: u16, host: impl Into<String>) -> Result<Self, SiteError> {
        let ip = ip.into();
        let host = host.into();
        if port == 0 {
            return Err(SiteError::InvalidBinding("端口不能为 0".to_string()));
        }
        if ip.is_empty() {
            return Err(SiteError::InvalidBinding("IP 不能为空".to_string()));
        }
        if host.contains(':') {
            return Err(SiteError::InvalidBinding(format!("主机头不能包含冒号: {}", host)));
        }
        Ok(Self { ip, port, host })
    }

    /// 所有地址上的端口绑定，无主机头
    pub fn any_address(port: u16) -> Result<Self, SiteError> {
        Self::new("*", port, "")
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for BindingInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.ip, self.port, self.host)
    }
}

impl FromStr for BindingInformation {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // IPv6 地址本身包含冒号，因此从右侧拆分
        let mut parts = s.rsplitn(3, ':');
        let host = parts.next();
        let port = parts.next();
        let ip = parts.next();

        match (ip, port, host) {
            (Some(ip), Some(port), Some(host)) => {
                let port: u16 = port
                    .parse()
                    .map_err(|_| SiteError::InvalidBinding(s.to_string()))?;
                Self::new(ip, port, host)
            }
            _ => Err(SiteError::InvalidBinding(s.to_string())),
        }
    }
}

/// HTTPS 绑定使用的证书
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateBinding {
    /// 证书指纹（十六进制）
    pub hash: String,
    /// 证书所在存储名称
    pub store_name: String,
}

/// 站点绑定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub protocol: Protocol,
    pub information: BindingInformation,
    pub certificate: Option<CertificateBinding>,
}

impl Binding {
    pub fn http(information: BindingInformation) -> Self {
        Self {
            protocol: Protocol::Http,
            information,
            certificate: None,
        }
    }

    pub fn https(information: BindingInformation, certificate: CertificateBinding) -> Self {
        Self {
            protocol: Protocol::Https,
            information,
            certificate: Some(certificate),
        }
    }

    /// 两个绑定是否监听同一个端点
    pub fn collides_with(&self, other: &Binding) -> bool {
        self.information.port == other.information.port
            && names_match(&self.information.host, &other.information.host)
            && (self.information.ip == other.information.ip
                || self.information.ip == "*"
                || other.information.ip == "*")
    }
}

/// 站点/应用程序池运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectState {
    Started,
    Stopped,
}

impl ObjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectState::Started => "Started",
            ObjectState::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for ObjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectState {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Started" => Ok(ObjectState::Started),
            "Stopped" => Ok(ObjectState::Stopped),
            other => Err(SiteError::InvalidState(other.to_string())),
        }
    }
}

/// 托管管道模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PipelineMode {
    #[default]
    Integrated,
    Classic,
}

impl PipelineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineMode::Integrated => "Integrated",
            PipelineMode::Classic => "Classic",
        }
    }
}

impl FromStr for PipelineMode {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Integrated" => Ok(PipelineMode::Integrated),
            "Classic" => Ok(PipelineMode::Classic),
            other => Err(SiteError::InvalidState(format!("未知管道模式: {}", other))),
        }
    }
}

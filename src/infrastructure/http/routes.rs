//! HTTP Routes
//!
//! API Endpoints:
//! - /ping                              GET   健康检查
//! - /IIS/GetIISVersion                 GET   服务器主版本号
//! - /IIS/GetWebSiteList                GET   列出所有站点
//! - /IIS/WebsiteStart                  POST  启动站点
//! - /IIS/WebsiteStop                   POST  停止站点
//! - /IIS/WebsiteRemove                 POST  删除站点（幂等）
//! - /IIS/CreateWebSite                 POST  创建 HTTP 站点
//! - /IIS/CreateHttpsWebSite            POST  创建 HTTPS 站点
//! - /IIS/CreateVirtualSite             POST  在站点下创建应用
//! - /IIS/CloneCurrentWebSite           POST  复制内容根目录并创建站点
//! - /IIS/IsSiteExist                   GET   站点/应用存在性
//! - /IIS/GetWebSiteLocation            GET   站点应用物理路径
//! - /IIS/GetWebSiteState               GET   站点状态
//! - /IIS/GetApplicationPoolState       GET   应用程序池状态
//! - /IIS/ApplicationPoolStart          POST  启动应用程序池
//! - /IIS/ApplicationPoolStop           POST  停止应用程序池
//! - /IIS/ApplicationPoolRecycle        POST  回收应用程序池
//! - /IIS/GetCorrectFolderName          GET   整理目录名
//!
//! 参数均取自查询字符串

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/IIS", admin_routes())
}

/// 站点管理路由
fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/GetIISVersion", get(handlers::get_server_version))
        .route("/GetCorrectFolderName", get(handlers::get_correct_folder_name))
        .merge(site_routes())
        .merge(pool_routes())
}

/// Site 路由
fn site_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/GetWebSiteList", get(handlers::list_sites))
        .route("/WebsiteStart", post(handlers::start_site))
        .route("/WebsiteStop", post(handlers::stop_site))
        .route("/WebsiteRemove", post(handlers::remove_site))
        .route("/CreateWebSite", post(handlers::create_site))
        .route("/CreateHttpsWebSite", post(handlers::create_https_site))
        .route("/CreateVirtualSite", post(handlers::create_virtual_site))
        .route("/CloneCurrentWebSite", post(handlers::clone_site))
        .route("/IsSiteExist", get(handlers::is_site_exist))
        .route("/GetWebSiteLocation", get(handlers::get_site_location))
        .route("/GetWebSiteState", get(handlers::get_site_state))
}

/// Application Pool 路由
fn pool_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/GetApplicationPoolState", get(handlers::get_pool_state))
        .route("/ApplicationPoolStart", post(handlers::start_pool))
        .route("/ApplicationPoolStop", post(handlers::stop_pool))
        .route("/ApplicationPoolRecycle", post(handlers::recycle_pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::application::SiteDefaults;
    use crate::infrastructure::adapters::{FileCertificateStore, FsContentCopier};
    use crate::infrastructure::memory::InMemorySiteStore;

    fn test_router(temp: &Path) -> Router {
        let state = AppState::new(
            Arc::new(InMemorySiteStore::new(10)),
            Arc::new(FileCertificateStore::new(temp.join("certs"), "TrustedPeople")),
            Arc::new(FsContentCopier::new()),
            SiteDefaults::default(),
            temp.join("current"),
        );
        create_routes().with_state(Arc::new(state))
    }

    async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ping_and_version() {
        let temp = TempDir::new().unwrap();
        let app = test_router(temp.path());

        let (status, body) = call(&app, "GET", "/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = call(&app, "GET", "/IIS/GetIISVersion").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"], 10);
    }

    #[tokio::test]
    async fn test_site_lifecycle() {
        let temp = TempDir::new().unwrap();
        let app = test_router(temp.path());

        let (status, body) = call(
            &app,
            "POST",
            "/IIS/CreateWebSite?siteName=shop&path=/srv/shop&port=8080",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["ApplicationPool"], "shop");
        assert_eq!(body["data"]["PoolCreated"], true);

        let (_, body) = call(&app, "GET", "/IIS/GetWebSiteList").await;
        let sites = body["data"].as_array().unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0]["SiteName"], "shop");
        assert_eq!(sites[0]["Ports"][0], "*:8080:");
        assert_eq!(sites[0]["Path"], "/srv/shop");
        assert_eq!(sites[0]["State"], "Started");

        let (status, _) = call(&app, "POST", "/IIS/WebsiteStop?siteName=shop").await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = call(&app, "GET", "/IIS/GetWebSiteState?siteName=SHOP").await;
        assert_eq!(body["data"]["Presence"], "Present");
        assert_eq!(body["data"]["State"], "Stopped");

        let (_, body) = call(&app, "GET", "/IIS/GetWebSiteLocation?siteName=shop").await;
        assert_eq!(body["data"]["PhysicalPath"], "/srv/shop");
        assert_eq!(body["data"]["ApplicationPool"], "shop");

        let (status, body) = call(&app, "POST", "/IIS/WebsiteRemove?siteName=shop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["SiteRemoved"], true);
        assert_eq!(body["data"]["PoolRemoved"], true);

        // 再次删除同样成功
        let (status, body) = call(&app, "POST", "/IIS/WebsiteRemove?siteName=shop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["SiteRemoved"], false);

        let (_, body) = call(&app, "GET", "/IIS/IsSiteExist?siteName=shop").await;
        assert_eq!(body["data"]["Site"], "Absent");

        let (_, body) = call(&app, "GET", "/IIS/GetWebSiteLocation?siteName=shop").await;
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_error_envelopes() {
        let temp = TempDir::new().unwrap();
        let app = test_router(temp.path());

        let (status, body) = call(&app, "POST", "/IIS/WebsiteStart?siteName=ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errno"], 404);
        assert!(body["data"].is_null());

        let (status, body) = call(
            &app,
            "POST",
            "/IIS/CreateWebSite?siteName=shop&path=/srv/shop&port=abc",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errno"], 400);

        call(
            &app,
            "POST",
            "/IIS/CreateWebSite?siteName=shop&path=/srv/shop&port=8080",
        )
        .await;
        let (status, _) = call(
            &app,
            "POST",
            "/IIS/CreateWebSite?siteName=SHOP&path=/srv/other&port=8081",
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        call(&app, "POST", "/IIS/ApplicationPoolStop?poolName=shop").await;
        let (status, _) = call(&app, "POST", "/IIS/ApplicationPoolRecycle?poolName=shop").await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = call(&app, "GET", "/IIS/GetApplicationPoolState?poolName=shop").await;
        assert_eq!(body["data"]["State"], "Stopped");
    }

    #[tokio::test]
    async fn test_clone_current_web_site() {
        let temp = TempDir::new().unwrap();
        let current = temp.path().join("current");
        tokio::fs::create_dir_all(current.join("assets")).await.unwrap();
        tokio::fs::write(current.join("index.html"), b"hello").await.unwrap();
        tokio::fs::write(current.join("assets/app.js"), b"js").await.unwrap();
        let app = test_router(temp.path());

        let (status, body) = call(
            &app,
            "POST",
            "/IIS/CloneCurrentWebSite?siteName=foo&port=8080",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["FilesCopied"], 2);
        assert_eq!(body["data"]["Site"]["Ports"][0], "*:8080:");

        let target = temp.path().join("foo");
        assert_eq!(
            tokio::fs::read(target.join("assets/app.js")).await.unwrap(),
            b"js".to_vec()
        );
        assert_eq!(
            body["data"]["Site"]["Path"],
            target.to_string_lossy().as_ref()
        );
    }

    #[tokio::test]
    async fn test_create_https_web_site() {
        let temp = TempDir::new().unwrap();
        let certificate = temp.path().join("site.pem");
        tokio::fs::write(
            &certificate,
            include_bytes!("../adapters/certificate/testdata/siteadmin-test.pem"),
        )
        .await
        .unwrap();
        let app = test_router(temp.path());

        let uri = format!(
            "/IIS/CreateHttpsWebSite?siteName=secure&path=/srv/secure&hostName=siteadmin.test&certificatePath={}",
            certificate.display()
        );
        let (status, body) = call(&app, "POST", &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["Ports"][0], "*:443:siteadmin.test");
        assert_eq!(body["data"]["ApplicationPool"], "DefaultAppPool");

        let (_, body) = call(
            &app,
            "GET",
            "/IIS/GetApplicationPoolState?poolName=DefaultAppPool",
        )
        .await;
        assert_eq!(body["data"]["Presence"], "Present");
    }

    #[tokio::test]
    async fn test_virtual_site_and_folder_name() {
        let temp = TempDir::new().unwrap();
        let app = test_router(temp.path());

        call(
            &app,
            "POST",
            "/IIS/CreateWebSite?siteName=shop&path=/srv/shop&port=8080",
        )
        .await;
        let (status, body) = call(
            &app,
            "POST",
            "/IIS/CreateVirtualSite?siteName=shop&virtualPath=api&path=/srv/api&poolName=api",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["Path"], "/api");
        assert_eq!(body["data"]["ApplicationPool"], "api");

        let (_, body) = call(
            &app,
            "GET",
            "/IIS/IsSiteExist?siteName=shop&application=/api",
        )
        .await;
        assert_eq!(body["data"]["Site"], "Present");
        assert_eq!(body["data"]["Application"], "Present");

        let (_, body) = call(
            &app,
            "GET",
            "/IIS/GetCorrectFolderName?name=My%20Site%20%231%20%C2%A9",
        )
        .await;
        assert_eq!(body["data"], "MySite1");
    }
}

//! Server HTTP Handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::GetServerVersion;
use crate::domain::correct_folder_name;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FolderNameParams {
    pub name: String,
}

/// 存储记录的服务器主版本号，读取失败时为 -1
pub async fn get_server_version(State(state): State<Arc<AppState>>) -> Json<ApiResponse<i32>> {
    let version = state
        .get_server_version_handler
        .handle(GetServerVersion)
        .await;
    Json(ApiResponse::success(version))
}

/// 把任意名称整理为可用的目录名
pub async fn get_correct_folder_name(
    params: Result<Query<FolderNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(ApiResponse::success(correct_folder_name(&params.name))))
}

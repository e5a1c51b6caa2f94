//! Application Pool HTTP Handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::{GetPoolState, RecyclePool, StartPool, StopPool};
use crate::infrastructure::http::dto::{ApiResponse, Empty, ObjectStatusDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolNameParams {
    pub pool_name: String,
}

/// 应用程序池存在性与运行状态
pub async fn get_pool_state(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PoolNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<ObjectStatusDto>>, ApiError> {
    let Query(params) = params?;
    let status = state
        .get_pool_state_handler
        .handle(GetPoolState {
            pool_name: params.pool_name,
        })
        .await?;
    Ok(Json(ApiResponse::success(status.into())))
}

pub async fn start_pool(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PoolNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let Query(params) = params?;
    state
        .start_pool_handler
        .handle(StartPool {
            pool_name: params.pool_name,
        })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn stop_pool(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PoolNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let Query(params) = params?;
    state
        .stop_pool_handler
        .handle(StopPool {
            pool_name: params.pool_name,
        })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// 回收应用程序池，已停止的池返回 409
pub async fn recycle_pool(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PoolNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let Query(params) = params?;
    state
        .recycle_pool_handler
        .handle(RecyclePool {
            pool_name: params.pool_name,
        })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

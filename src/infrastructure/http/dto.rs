//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{CancelGenerationResponse, StartGenerationResponse};
use crate::domain::ebook::Theme;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize, Deserialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Ebook DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateEbookRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_template: Option<String>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

/// 按 ID 操作电子书（get / delete）
#[derive(Debug, Deserialize)]
pub struct EbookIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEbookRequest {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_template: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateThemeRequest {
    pub id: Uuid,
    pub theme: Theme,
}

// ============================================================================
// Page DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub ebook_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub order: Option<usize>,
}

/// 按 ID 操作页面（get / delete）
#[derive(Debug, Deserialize)]
pub struct PageIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListPagesRequest {
    pub ebook_id: Uuid,
}

// ============================================================================
// Generation DTOs（camelCase，与生成端点保持一致）
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGenerationRequest {
    pub ebook_id: Uuid,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGenerationData {
    pub run_id: Uuid,
    pub ebook_id: Uuid,
}

impl From<StartGenerationResponse> for StartGenerationData {
    fn from(r: StartGenerationResponse) -> Self {
        Self {
            run_id: r.run_id,
            ebook_id: r.ebook_id,
        }
    }
}

/// 按 run_id 操作生成运行（status / cancel）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunIdRequest {
    pub run_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelGenerationData {
    pub run_id: Uuid,
    pub cancelled: bool,
}

impl From<CancelGenerationResponse> for CancelGenerationData {
    fn from(r: CancelGenerationResponse) -> Self {
        Self {
            run_id: r.run_id,
            cancelled: r.cancelled,
        }
    }
}

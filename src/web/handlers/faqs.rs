//! FAQ 资源处理器
//!
//! 处理器只做输入校验和状态码映射，业务语义都在
//! [`FaqService`](crate::service::FaqService) 中。

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::model::{FaqDetail, FaqView};
use crate::web::error::ApiError;
use crate::web::types::{AppState, DeleteFaqResponse, LangQuery, UpsertFaqRequest};

/// GET /api/faqs?lang=xx
pub async fn list_faqs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<FaqView>>, ApiError> {
    let views = state.service.list_faqs(query.lang.as_deref()).await?;
    Ok(Json(views))
}

/// GET /api/faqs/:id?lang=xx
pub async fn get_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<FaqView>, ApiError> {
    let view = state.service.get_faq(&id, query.lang.as_deref()).await?;
    view.map(Json).ok_or(ApiError::NotFound)
}

/// POST /api/faqs，成功时返回 201 与完整记录
pub async fn create_faq(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpsertFaqRequest>,
) -> Result<(StatusCode, Json<FaqDetail>), ApiError> {
    let (question, answer) = validate_text(&request)?;
    let detail = state
        .service
        .create_faq(&question, &answer, request.language.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /api/faqs/:id，成功时返回完整记录
pub async fn update_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpsertFaqRequest>,
) -> Result<Json<FaqDetail>, ApiError> {
    let (question, answer) = validate_text(&request)?;
    let detail = state
        .service
        .update_faq(&id, &question, &answer, request.language.as_deref())
        .await?;
    detail.map(Json).ok_or(ApiError::NotFound)
}

/// DELETE /api/faqs/:id
pub async fn delete_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteFaqResponse>, ApiError> {
    if state.service.delete_faq(&id).await? {
        Ok(Json(DeleteFaqResponse {
            message: "FAQ deleted successfully".to_string(),
        }))
    } else {
        Err(ApiError::NotFound)
    }
}

/// 校验问答文本非空
///
/// 只按去除空白后的内容判断是否为空，通过校验后原样保留客户端
/// 文本，不做任何归一化。
fn validate_text(request: &UpsertFaqRequest) -> Result<(String, String), ApiError> {
    let mut errors = Vec::new();
    if request.question.as_deref().map(str::trim).unwrap_or("").is_empty() {
        errors.push("Question is required".to_string());
    }
    if request.answer.as_deref().map(str::trim).unwrap_or("").is_empty() {
        errors.push("Answer is required".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok((
        request.question.clone().unwrap_or_default(),
        request.answer.clone().unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(question: Option<&str>, answer: Option<&str>) -> UpsertFaqRequest {
        UpsertFaqRequest {
            question: question.map(str::to_string),
            answer: answer.map(str::to_string),
            language: None,
        }
    }

    #[test]
    fn test_validation_rejects_missing_and_blank_fields() {
        assert!(validate_text(&request(None, None)).is_err());
        assert!(validate_text(&request(Some("   "), Some("A"))).is_err());
        assert!(validate_text(&request(Some("Q"), Some(""))).is_err());

        let err = validate_text(&request(None, Some("A"))).unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors, vec!["Question is required".to_string()]);
            }
            other => panic!("unexpected error variant: {:?}", other),
        }
    }

    #[test]
    fn test_validation_keeps_text_as_provided() {
        let (question, answer) = validate_text(&request(Some("  Q1  "), Some("A1"))).unwrap();
        assert_eq!(question, "  Q1  ", "Client text is stored without trimming");
        assert_eq!(answer, "A1");
    }
}

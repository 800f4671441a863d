//! Uniform result envelope handed to the external controller layer.
//!
//! Wire shape: `{"state": bool, "msg": <payload>, "count": <n>}` where
//! `count` is omitted when an operation has nothing to count. Failures carry
//! `{"kind": ..., "message": ...}` in `msg`.

use crate::model::block::BlockSummary;
use crate::repo::block_repo::BlockPage;
use crate::service::block_service::{BlockServiceError, ServiceResult};
use serde::Serialize;

/// Structured failure body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl From<&BlockServiceError> for ErrorBody {
    fn from(err: &BlockServiceError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Envelope payload: typed data, a structured error, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvelopePayload<T> {
    Data(T),
    Error(ErrorBody),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiEnvelope<T> {
    pub state: bool,
    pub msg: EnvelopePayload<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            state: true,
            msg: EnvelopePayload::Data(data),
            count: None,
        }
    }

    pub fn failure(err: &BlockServiceError) -> Self {
        Self {
            state: false,
            msg: EnvelopePayload::Error(err.into()),
            count: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state
    }
}

impl<T> From<ServiceResult<T>> for ApiEnvelope<T> {
    fn from(result: ServiceResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }
}

impl ApiEnvelope<Vec<BlockSummary>> {
    /// Page rows in `msg`, total match count in `count`.
    pub fn from_page(result: ServiceResult<BlockPage>) -> Self {
        match result {
            Ok(page) => Self {
                state: true,
                msg: EnvelopePayload::Data(page.items),
                count: Some(page.total),
            },
            Err(err) => Self::failure(&err),
        }
    }
}

impl ApiEnvelope<()> {
    /// Empty `msg`, rows affected in `count`.
    pub fn from_affected(result: ServiceResult<usize>) -> Self {
        match result {
            Ok(rows) => Self {
                state: true,
                msg: EnvelopePayload::Empty,
                count: Some(rows as u64),
            },
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiEnvelope;
    use crate::model::block::{Block, BlockSummary};
    use crate::repo::block_repo::BlockPage;
    use crate::service::block_service::{BlockServiceError, ServiceResult};
    use serde_json::json;

    #[test]
    fn success_omits_count() {
        let envelope = ApiEnvelope::success(Block {
            id: 1,
            title: "Hello".to_string(),
            content: "World".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"state": true, "msg": {"id": 1, "title": "Hello", "content": "World"}})
        );
    }

    #[test]
    fn failure_carries_kind_and_message() {
        let result: ServiceResult<Block> = Err(BlockServiceError::NotFound(9));
        let envelope = ApiEnvelope::from(result);
        assert!(!envelope.is_success());
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"state": false, "msg": {"kind": "not_found", "message": "block not found: 9"}})
        );
    }

    #[test]
    fn page_envelope_reports_total_count() {
        let page = BlockPage {
            items: vec![BlockSummary {
                id: 3,
                title: "intro".to_string(),
            }],
            total: 12,
        };
        let envelope = ApiEnvelope::from_page(Ok(page));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"state": true, "msg": [{"id": 3, "title": "intro"}], "count": 12})
        );
    }

    #[test]
    fn affected_envelope_has_null_payload() {
        let envelope = ApiEnvelope::from_affected(Ok(0));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"state": true, "msg": null, "count": 0})
        );
    }
}

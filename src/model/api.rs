use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// One page of a paginated listing
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// `?page=1&page_size=10` query parameters
#[derive(Deserialize, IntoParams, Debug, Default, Clone, Copy)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number, defaults to 1
    pub page: Option<u64>,
    /// Items per page between 1 and 100, defaults to 10
    pub page_size: Option<u64>,
}

impl PageParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Unread counter used by notifications and chat
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UnreadCountDto {
    pub count: u64,
}

/// A stored enumeration value did not match any known variant
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::PageParams;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let params = PageParams::default();

        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 10);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let params = PageParams {
            page: Some(0),
            page_size: Some(500),
        };

        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 100);

        let params = PageParams {
            page: Some(3),
            page_size: Some(0),
        };

        assert_eq!(params.page(), 3);
        assert_eq!(params.page_size(), 1);
    }
}

use serde::Deserialize;

use crate::{model::ListWindow, quiz::QuizResult};

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// 1..=100, defaults to 20
    limit: Option<i64>,
    /// defaults to 0
    offset: Option<i64>,
}

impl PaginationQuery {
    pub fn window(&self) -> QuizResult<ListWindow> {
        ListWindow::new(
            self.limit.unwrap_or(ListWindow::DEFAULT_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let window = PaginationQuery::default().window().unwrap();
        assert_eq!(window, ListWindow::default());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let q = PaginationQuery {
            limit: Some(500),
            offset: None,
        };
        assert!(q.window().is_err());
    }
}

use serde::{Deserialize, Serialize};

use crate::quiz::{QuizError, QuizResult};

#[derive(Debug, Clone)]
pub enum ResourceType {
    QuizAttempt,
    Question,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

/// LIMIT/OFFSET pair, checked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    limit: i64,
    offset: i64,
}

impl ListWindow {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(limit: i64, offset: i64) -> QuizResult<Self> {
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(QuizError::validation(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        if offset < 0 {
            return Err(QuizError::validation("offset must not be negative"));
        }
        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub(crate) fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for ListWindow {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn list_window_bounds() {
        assert!(ListWindow::new(0, 0).is_err());
        assert!(ListWindow::new(101, 0).is_err());
        assert!(ListWindow::new(10, -1).is_err());
        assert_eq!(ListWindow::default().limit(), 20);
    }

    #[test]
    fn list_window_slices() {
        let w = ListWindow::new(2, 1).unwrap();
        assert_eq!(w.slice(vec![1, 2, 3, 4]), vec![2, 3]);
        assert!(w.slice(Vec::<i32>::new()).is_empty());
    }
}

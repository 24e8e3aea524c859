//! Paging requests and result pages.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::sort::Sort;

/// A zero-based page request with an optional sort
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
    #[serde(default)]
    sort: Sort,
}

impl PageRequest {
    /// Unsorted page request; `size` must be at least one
    pub fn of(page: u32, size: u32) -> Result<Self, DomainError> {
        Self::sorted(page, size, Sort::unsorted())
    }

    pub fn sorted(page: u32, size: u32, sort: Sort) -> Result<Self, DomainError> {
        if size == 0 {
            return Err(DomainError::validation(
                "Page size must not be less than one",
            ));
        }
        Ok(Self { page, size, sort })
    }

    pub fn page_number(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Index of the first element of this page in the full result
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Same page number and size with a different sort
    pub fn with_sort(&self, sort: Sort) -> Self {
        Self {
            page: self.page,
            size: self.size,
            sort,
        }
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

/// One page of results plus the total number of elements available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    content: Vec<T>,
    request: PageRequest,
    total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            request,
            total_elements,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn number(&self) -> u32 {
        self.request.page_number()
    }

    pub fn size(&self) -> u32 {
        self.request.page_size()
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        let size = u64::from(self.request.page_size());
        self.total_elements.div_ceil(size)
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.number()) + 1 < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            request: self.request,
            total_elements: self.total_elements,
        }
    }

    /// Maps every element, stopping at the first failure
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let content = self.content.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            content,
            request: self.request,
            total_elements: self.total_elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(PageRequest::of(0, 0).is_err());
    }

    #[test]
    fn offset_and_total_pages() {
        let request = PageRequest::of(2, 10).unwrap();
        assert_eq!(request.offset(), 20);

        let page = Page::new(vec![1, 2, 3], request, 23);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_next());
        assert_eq!(page.number_of_elements(), 3);
    }

    #[test]
    fn try_map_stops_on_first_error() {
        let page = Page::new(vec![1, 2, 3], PageRequest::of(0, 3).unwrap(), 3);
        let result: Result<Page<i32>, &str> =
            page.try_map(|v| if v == 2 { Err("boom") } else { Ok(v * 10) });
        assert_eq!(result.unwrap_err(), "boom");
    }
}

//! Lazy page-by-page record streams.

use crate::error::FetchError;

type PageFetcher<'a, T> = Box<dyn FnMut(u32) -> Result<Vec<T>, FetchError> + 'a>;

/// A finite, non-restartable stream of records pulled one page at a time.
///
/// Pages are requested only when the previous page has been drained. The
/// stream ends after a page shorter than the page size (an empty page
/// included), or after the first page for single-document sources. A fetch
/// error is yielded once and ends the stream.
pub struct Paginated<'a, T> {
    fetch_page: PageFetcher<'a, T>,
    page_size: usize,
    single: bool,
    next_page: u32,
    buffer: std::vec::IntoIter<T>,
    done: bool,
}

impl<'a, T> Paginated<'a, T> {
    /// Stream pages of `page_size` records. The closure receives the 0-based
    /// page index.
    pub fn new<F>(page_size: usize, fetch_page: F) -> Self
    where
        F: FnMut(u32) -> Result<Vec<T>, FetchError> + 'a,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            page_size,
            single: false,
            next_page: 0,
            buffer: Vec::new().into_iter(),
            done: false,
        }
    }

    /// Stream a single document; the closure is called once with index 0.
    pub fn single<F>(fetch_document: F) -> Self
    where
        F: FnMut(u32) -> Result<Vec<T>, FetchError> + 'a,
    {
        Self {
            single: true,
            ..Self::new(usize::MAX, fetch_document)
        }
    }

    /// Number of page requests issued so far.
    #[must_use]
    pub const fn requests(&self) -> u32 {
        self.next_page
    }
}

impl<T> Iterator for Paginated<'_, T> {
    type Item = Result<T, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.next() {
                return Some(Ok(record));
            }
            if self.done {
                return None;
            }

            let page = self.next_page;
            self.next_page += 1;
            match (self.fetch_page)(page) {
                Ok(records) => {
                    if self.single || records.is_empty() || records.len() < self.page_size {
                        self.done = true;
                    }
                    self.buffer = records.into_iter();
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

//! Lazy paging over `Link: <...>; rel="next"` collections

use crate::client::JsonResources;
use crate::link::next_link;
use crate::resource::Resource;
use crate::{ClientError, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use url::Url;

/// Forward-only sequence of pages, one GET per element
///
/// Starts at the URI given to [`ResourcePaging::new`] and follows the
/// `rel="next"` link of every page until a page has none. Each page is
/// requested with `Cache-Control: no-cache` so intermediaries hand out a
/// fresh copy; a [`crate::CachedJsonResources`] underneath still applies
/// its own conditional GET.
///
/// A page answered with anything but `200` ends the sequence with
/// [`ClientError::UnexpectedStatus`]; a transport failure ends it with that
/// error. After an error or the last page the iterator only yields `None`.
/// There is no page limit, use [`Iterator::take`] to impose one.
///
/// The sequence cannot be restarted; build a new one to start over.
///
/// # Example
///
/// ```rust,no_run
/// use forge_client::{HttpClientConfig, HttpJsonResources, ResourcePaging};
///
/// # fn example() -> forge_client::Result<()> {
/// let client = HttpJsonResources::new(HttpClientConfig::default())?;
/// let start = url::Url::parse("https://api.github.com/repos/rust-lang/rust/issues").unwrap();
///
/// for page in ResourcePaging::new(&client, start).take(10) {
///     let issues = page?.json_array()?;
///     println!("{} issues", issues.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ResourcePaging<'a, C: JsonResources + ?Sized> {
    resources: &'a C,
    next_uri: Option<Url>,
    pages: usize,
}

impl<'a, C: JsonResources + ?Sized> ResourcePaging<'a, C> {
    pub fn new(resources: &'a C, start: Url) -> Self {
        Self {
            resources,
            next_uri: Some(start),
            pages: 0,
        }
    }

    /// Whether another page will be requested by the next call to `next`
    pub fn has_next(&self) -> bool {
        self.next_uri.is_some()
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    fn fetch(&mut self, uri: Url) -> Result<Resource> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let page = self.resources.get_with_headers(&uri, headers)?;
        if page.status() != 200 {
            return Err(ClientError::UnexpectedStatus {
                uri: uri.to_string(),
                status: page.status(),
            });
        }

        self.next_uri = match next_link(&page) {
            Some(link) => Some(uri.join(&link).map_err(|source| ClientError::InvalidLink {
                uri: uri.to_string(),
                link,
                source,
            })?),
            None => None,
        };
        self.pages += 1;

        debug!(
            "Fetched page {} from {} (next: {})",
            self.pages,
            uri,
            self.next_uri.as_ref().map_or("none", Url::as_str)
        );
        Ok(page)
    }
}

impl<C: JsonResources + ?Sized> Iterator for ResourcePaging<'_, C> {
    type Item = Result<Resource>;

    fn next(&mut self) -> Option<Self::Item> {
        let uri = self.next_uri.take()?;
        Some(self.fetch(uri))
    }
}

impl<C: JsonResources + ?Sized> std::iter::FusedIterator for ResourcePaging<'_, C> {}

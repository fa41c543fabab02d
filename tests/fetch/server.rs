//! In-memory paginated server shared by the fetch tests.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use grove_fetch::{FetchError, Page, PageFetcher, PageQuery};
use grove_foundation::Entity;
use grove_query::{
    FieldKind, FieldSpec, FilterSortContext, FilterValue, QuerySchema, SortDirection,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Sponsorship {
    pub id: u32,
    pub sponsor: String,
    pub trees: u32,
}

impl Entity for Sponsorship {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

pub fn schema() -> Arc<QuerySchema> {
    Arc::new(
        QuerySchema::new()
            .with_field(FieldSpec::new("id", FieldKind::Number))
            .with_field(FieldSpec::new("sponsor", FieldKind::Text))
            .with_field(FieldSpec::new("trees", FieldKind::Number)),
    )
}

pub fn context() -> FilterSortContext {
    FilterSortContext::new(schema())
}

/// Serves `rows` sponsorships, honouring a `sponsor` contains filter and a
/// single `trees` or `id` sort term.
pub struct Server {
    rows: Vec<Sponsorship>,
    latency: Duration,
    failures: RefCell<usize>,
    pub log: RefCell<Vec<PageQuery>>,
}

impl Server {
    pub fn new(count: u32) -> Self {
        let rows = (0..count)
            .map(|id| Sponsorship {
                id,
                sponsor: if id % 2 == 0 { "Acme".into() } else { "Birchwood".into() },
                trees: (id * 7) % 50,
            })
            .collect();
        Self {
            rows,
            latency: Duration::ZERO,
            failures: RefCell::new(0),
            log: RefCell::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes the next `n` calls fail.
    pub fn fail_next(&self, n: usize) {
        *self.failures.borrow_mut() = n;
    }

    pub fn calls(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn answer(&self, query: &PageQuery) -> Result<Page<Sponsorship>, FetchError> {
        {
            let mut failures = self.failures.borrow_mut();
            if *failures > 0 {
                *failures -= 1;
                return Err(FetchError::Rejected {
                    status: 503,
                    message: "try again".into(),
                });
            }
        }

        let mut rows: Vec<Sponsorship> = self
            .rows
            .iter()
            .filter(|r| {
                query.filters.iter().all(|f| match (&*f.field, &f.value) {
                    ("sponsor", FilterValue::Text(needle)) => r.sponsor.contains(needle.as_str()),
                    _ => true,
                })
            })
            .cloned()
            .collect();

        if let Some(sort) = query.order.first() {
            match sort.field.as_str() {
                "trees" => rows.sort_by_key(|r| (r.trees, r.id)),
                _ => rows.sort_by_key(|r| r.id),
            }
            if sort.direction == SortDirection::Descending {
                rows.reverse();
            }
        }

        let total = rows.len();
        let results = rows.into_iter().skip(query.offset).take(query.limit).collect();
        Ok(Page { total, results })
    }
}

impl PageFetcher<Sponsorship> for Server {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Page<Sponsorship>, FetchError> {
        self.log.borrow_mut().push(query.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.answer(query)
    }
}

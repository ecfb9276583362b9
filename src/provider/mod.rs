//! Page providers: the host-supplied boundary that fills a `PageSet`.

mod system;

pub use system::SystemPageProvider;

use std::time::Instant;

use crate::config::Config;
use crate::error::Result;
use crate::models::PageSet;

/// Fills an empty `PageSet` with diagnostic pages.
///
/// Implemented by the host application. The provider receives a fresh,
/// empty set on every cycle and returns it populated; it may mutate and
/// return the same container. Closures of the right shape are providers too.
pub trait PageProvider {
    fn populate(&mut self, pages: PageSet, config: &Config) -> Result<PageSet>;
}

impl<F> PageProvider for F
where
    F: FnMut(PageSet, &Config) -> Result<PageSet>,
{
    fn populate(&mut self, pages: PageSet, config: &Config) -> Result<PageSet> {
        self(pages, config)
    }
}

/// Run one population cycle: hand the provider a fresh set, then apply the
/// config's page filter. Provider errors propagate unchanged.
pub fn populate_fresh(provider: &mut dyn PageProvider, config: &Config) -> Result<PageSet> {
    let started = Instant::now();
    let pages = provider
        .populate(PageSet::new(), config)?
        .without_pages(config.hidden_pages());
    tracing::debug!(
        pages = pages.len(),
        entries = pages.entry_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "populated page set"
    );
    Ok(pages)
}

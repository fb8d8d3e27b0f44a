use crate::charts::ChartSpec;
use crate::errors::SyncError;
use crate::router::Page;
use crate::views::PageViews;

/// Whatever the views end up painted on: a DOM, an HTML document, a test log.
pub trait Surface {
    /// Handle to a mounted chart, released through [`Surface::destroy_chart`].
    type Chart;

    fn paint(&mut self, views: &PageViews);

    /// Shows `page` and hides every other page section.
    fn activate(&mut self, page: Page);

    /// Non-blocking notice about a failed sync.
    fn notice(&mut self, error: &SyncError);

    fn clear_notice(&mut self) {}

    fn create_chart(&mut self, spec: &ChartSpec) -> Self::Chart;

    fn destroy_chart(&mut self, chart: Self::Chart);
}

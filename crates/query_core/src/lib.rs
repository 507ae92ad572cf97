pub mod format;
pub mod pagination;
pub mod query;
pub mod remote;
pub mod resolve;

pub use format::{format_records, OutputMode};
pub use pagination::{aggregate, page_size_for};
pub use query::{EventQuery, EventSource, MintsQuery, SalesQuery};
pub use remote::{EventsClient, EventsClientConfig};
pub use resolve::{resolve_sort, MintFilterOptions, ResolveFilter, SaleFilterOptions};

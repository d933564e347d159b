use chrono::{DateTime, Local};

use crate::directory::{DirectoryResult, ProductReader, TraceRecorder};
use crate::domain::product::Product;
use crate::domain::trace::TraceRequest;
use crate::forms::trace::{TraceForm, TraceFormError};
use crate::services::{FieldEdit, Notice};

/// State of the catalog browser screen.
///
/// The update function consumes the current snapshot and returns the next
/// one; nothing here is mutated behind the scenes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CatalogState {
    /// Product list as last received from the directory.
    pub products: Vec<Product>,
    /// Product currently picked for tracing, if any.
    pub selected: Option<i64>,
    /// Email input. One buffer serves every selection, so switching products
    /// keeps whatever was already typed.
    pub email: String,
    /// Latest notice to surface.
    pub notice: Option<Notice>,
    /// When the product list was last replaced.
    pub refreshed_at: Option<DateTime<Local>>,
}

/// Everything that can happen to the catalog screen.
#[derive(Debug)]
pub enum CatalogEvent {
    /// The directory answered the list request issued at mount.
    ProductsLoaded(DirectoryResult<Vec<Product>>),
    /// The visitor picked a product to trace.
    Selected(i64),
    /// The visitor dismissed the trace prompt without submitting.
    SelectionCleared,
    /// The email input changed.
    EmailEdited(FieldEdit),
    /// The visitor confirmed the trace.
    TraceSubmitted,
    /// The directory answered a trace request.
    TraceRecorded(DirectoryResult<()>),
}

/// Directory calls requested by the catalog screen.
#[derive(Debug, PartialEq)]
pub enum CatalogCommand {
    LoadProducts,
    RecordTrace(TraceRequest),
}

/// Fresh catalog state together with the mount-time fetch.
pub fn init() -> (CatalogState, CatalogCommand) {
    (CatalogState::default(), CatalogCommand::LoadProducts)
}

/// Advance the catalog screen by one event.
pub fn update(
    mut state: CatalogState,
    event: CatalogEvent,
) -> (CatalogState, Option<CatalogCommand>) {
    match event {
        CatalogEvent::ProductsLoaded(Ok(products)) => {
            state.products = products;
            state.refreshed_at = Some(Local::now());
            (state, None)
        }
        CatalogEvent::ProductsLoaded(Err(err)) => {
            // The empty-state line is the whole fallback here; visitors see
            // no error, operators see the log.
            log::error!("Failed to fetch products: {err}");
            (state, None)
        }
        CatalogEvent::Selected(product_id) => {
            state.selected = Some(product_id);
            (state, None)
        }
        CatalogEvent::SelectionCleared => {
            state.selected = None;
            (state, None)
        }
        CatalogEvent::EmailEdited(edit) => {
            edit.apply(&mut state.email);
            (state, None)
        }
        CatalogEvent::TraceSubmitted => {
            let Some(product_id) = state.selected else {
                return (state, None);
            };

            match TraceForm::new(state.email.clone()).into_trace_request(product_id) {
                Ok(request) => (state, Some(CatalogCommand::RecordTrace(request))),
                Err(TraceFormError::EmptyEmail) => {
                    state.notice = Some(Notice::error("Please enter an email address"));
                    (state, None)
                }
                Err(TraceFormError::InvalidEmail { .. }) => {
                    state.notice = Some(Notice::error("Please enter a valid email address"));
                    (state, None)
                }
            }
        }
        CatalogEvent::TraceRecorded(Ok(())) => {
            state.notice = Some(Notice::success("Product traced successfully!"));
            state.email.clear();
            state.selected = None;
            (state, None)
        }
        CatalogEvent::TraceRecorded(Err(err)) => {
            log::error!("Failed to trace product: {err}");
            state.notice = Some(Notice::error("Failed to trace product"));
            (state, None)
        }
    }
}

/// Run one catalog command against the directory and report the outcome.
pub fn execute<D>(directory: &D, command: CatalogCommand) -> CatalogEvent
where
    D: ProductReader + TraceRecorder + ?Sized,
{
    match command {
        CatalogCommand::LoadProducts => CatalogEvent::ProductsLoaded(directory.list_products()),
        CatalogCommand::RecordTrace(request) => {
            CatalogEvent::TraceRecorded(directory.record_trace(&request))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::directory::mock::{MockProductReader, MockTraceRecorder};
    use crate::directory::{DirectoryError, DirectoryResult};
    use crate::services::NoticeLevel;

    fn sample_product(id: i64, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: format!("{name} description"),
            price,
        }
    }

    fn status_error() -> DirectoryError {
        DirectoryError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn loaded_state(products: Vec<Product>) -> CatalogState {
        let (state, _) = init();
        let (state, _) = update(state, CatalogEvent::ProductsLoaded(Ok(products)));
        state
    }

    fn type_email(mut state: CatalogState, email: &str) -> CatalogState {
        for ch in email.chars() {
            let (next, command) = update(state, CatalogEvent::EmailEdited(FieldEdit::Insert(ch)));
            assert!(command.is_none());
            state = next;
        }
        state
    }

    #[test]
    fn init_requests_the_product_list() {
        let (state, command) = init();

        assert!(state.products.is_empty());
        assert_eq!(command, CatalogCommand::LoadProducts);
    }

    #[test]
    fn loaded_products_replace_the_snapshot() {
        let (state, _) = init();

        let (state, command) = update(
            state,
            CatalogEvent::ProductsLoaded(Ok(vec![
                sample_product(1, "Widget", 9.99),
                sample_product(2, "Gadget", 24.5),
            ])),
        );

        assert!(command.is_none());
        assert_eq!(state.products.len(), 2);
        assert!(state.refreshed_at.is_some());
    }

    #[test]
    fn failed_load_keeps_the_screen_silent() {
        let (state, _) = init();

        let (state, command) = update(state, CatalogEvent::ProductsLoaded(Err(status_error())));

        assert!(command.is_none());
        assert!(state.products.is_empty());
        assert!(state.notice.is_none());
    }

    #[test]
    fn selecting_another_product_keeps_the_last_pick() {
        let state = loaded_state(vec![
            sample_product(1, "Widget", 9.99),
            sample_product(2, "Gadget", 24.5),
        ]);

        let (state, _) = update(state, CatalogEvent::Selected(1));
        let (state, _) = update(state, CatalogEvent::Selected(2));

        assert_eq!(state.selected, Some(2));
    }

    #[test]
    fn clearing_the_selection_keeps_the_email() {
        let state = loaded_state(vec![sample_product(1, "Widget", 9.99)]);
        let (state, _) = update(state, CatalogEvent::Selected(1));
        let state = type_email(state, "visitor@example.com");

        let (state, command) = update(state, CatalogEvent::SelectionCleared);

        assert!(command.is_none());
        assert_eq!(state.selected, None);
        assert_eq!(state.email, "visitor@example.com");
    }

    #[test]
    fn submit_without_selection_is_a_noop() {
        let state = loaded_state(vec![sample_product(1, "Widget", 9.99)]);
        let state = type_email(state, "visitor@example.com");

        let (state, command) = update(state, CatalogEvent::TraceSubmitted);

        assert!(command.is_none());
        assert!(state.notice.is_none());
    }

    #[test]
    fn submit_with_empty_email_prompts_for_one() {
        let state = loaded_state(vec![sample_product(1, "Widget", 9.99)]);
        let (state, _) = update(state, CatalogEvent::Selected(1));

        let (state, command) = update(state, CatalogEvent::TraceSubmitted);

        assert!(command.is_none());
        let notice = state.notice.expect("expected a notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.text, "Please enter an email address");
    }

    #[test]
    fn submit_with_invalid_email_is_rejected_locally() {
        let state = loaded_state(vec![sample_product(1, "Widget", 9.99)]);
        let (state, _) = update(state, CatalogEvent::Selected(1));
        let state = type_email(state, "a@b");

        let (state, command) = update(state, CatalogEvent::TraceSubmitted);

        assert!(command.is_none());
        let notice = state.notice.expect("expected a notice");
        assert_eq!(notice.text, "Please enter a valid email address");
        assert_eq!(state.email, "a@b");
    }

    #[test]
    fn submit_with_valid_email_requests_a_trace() {
        let state = loaded_state(vec![sample_product(1, "Widget", 9.99)]);
        let (state, _) = update(state, CatalogEvent::Selected(1));
        let state = type_email(state, "visitor@example.com");

        let (_, command) = update(state, CatalogEvent::TraceSubmitted);

        assert_eq!(
            command,
            Some(CatalogCommand::RecordTrace(TraceRequest::new(
                1,
                "visitor@example.com"
            )))
        );
    }

    #[test]
    fn successful_trace_clears_email_and_selection() {
        let state = loaded_state(vec![sample_product(1, "Widget", 9.99)]);
        let (state, _) = update(state, CatalogEvent::Selected(1));
        let state = type_email(state, "visitor@example.com");

        let (state, command) = update(state, CatalogEvent::TraceRecorded(Ok(())));

        assert!(command.is_none());
        assert_eq!(state.email, "");
        assert_eq!(state.selected, None);
        let notice = state.notice.expect("expected a notice");
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.text, "Product traced successfully!");
    }

    #[test]
    fn failed_trace_preserves_email_and_selection() {
        let state = loaded_state(vec![sample_product(1, "Widget", 9.99)]);
        let (state, _) = update(state, CatalogEvent::Selected(1));
        let state = type_email(state, "visitor@example.com");

        let (state, command) = update(state, CatalogEvent::TraceRecorded(Err(status_error())));

        assert!(command.is_none());
        assert_eq!(state.email, "visitor@example.com");
        assert_eq!(state.selected, Some(1));
        let notice = state.notice.expect("expected a notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.text, "Failed to trace product");
    }

    struct FakeDirectory {
        product_reader: MockProductReader,
        trace_recorder: MockTraceRecorder,
    }

    impl FakeDirectory {
        fn new() -> Self {
            Self {
                product_reader: MockProductReader::new(),
                trace_recorder: MockTraceRecorder::new(),
            }
        }
    }

    impl ProductReader for FakeDirectory {
        fn list_products(&self) -> DirectoryResult<Vec<Product>> {
            self.product_reader.list_products()
        }
    }

    impl TraceRecorder for FakeDirectory {
        fn record_trace(&self, trace: &TraceRequest) -> DirectoryResult<()> {
            self.trace_recorder.record_trace(trace)
        }
    }

    #[test]
    fn execute_load_reports_the_product_list() {
        let mut directory = FakeDirectory::new();
        directory
            .product_reader
            .expect_list_products()
            .times(1)
            .returning(|| Ok(vec![sample_product(1, "Widget", 9.99)]));

        let event = execute(&directory, CatalogCommand::LoadProducts);

        match event {
            CatalogEvent::ProductsLoaded(Ok(products)) => assert_eq!(products.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn execute_trace_passes_the_request_through() {
        let mut directory = FakeDirectory::new();
        directory
            .trace_recorder
            .expect_record_trace()
            .times(1)
            .withf(|trace| {
                assert_eq!(trace.product_id, 7);
                assert_eq!(trace.client_email, "visitor@example.com");
                true
            })
            .returning(|_| Ok(()));

        let event = execute(
            &directory,
            CatalogCommand::RecordTrace(TraceRequest::new(7, "visitor@example.com")),
        );

        assert!(matches!(event, CatalogEvent::TraceRecorded(Ok(()))));
    }
}

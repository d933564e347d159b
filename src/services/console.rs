use chrono::{DateTime, Local};

use crate::directory::{DirectoryResult, ProductReader, ProductWriter, TraceRecorder};
use crate::domain::product::{NewProduct, Product};
use crate::domain::trace::TraceRequest;
use crate::forms::products::ProductForm;
use crate::forms::trace::{TraceForm, TraceFormError};
use crate::services::{FieldEdit, Notice};

/// Which write kicked off the list refresh that is currently in flight.
///
/// The follow-up refresh settles the write: the draft is only reset once the
/// refreshed list has arrived, and a refresh failure is reported as the
/// original operation failing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PendingRefresh {
    /// The mount-time fetch, or nothing in flight.
    #[default]
    None,
    /// Refresh following a successful create or update.
    Submit,
    /// Refresh following a successful delete.
    Delete,
}

/// Fields of the create/edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Description,
    Price,
}

/// Trace input bound to a single product row.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceDraft {
    /// Row the email belongs to.
    pub product_id: i64,
    /// Email typed for that row so far.
    pub email: String,
}

impl TraceDraft {
    fn new(product_id: i64) -> Self {
        Self {
            product_id,
            email: String::new(),
        }
    }
}

/// State of the management console screen.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConsoleState {
    /// Product list as last received from the directory.
    pub products: Vec<Product>,
    /// Create/edit form buffers.
    pub draft: ProductForm,
    /// Product being edited; `None` means the form creates.
    pub editing: Option<Product>,
    /// Trace input for one row, when a trace is being prepared.
    pub trace: Option<TraceDraft>,
    /// Which write the next list refresh settles.
    pub pending: PendingRefresh,
    /// Latest notice to surface.
    pub notice: Option<Notice>,
    /// When the product list was last replaced.
    pub refreshed_at: Option<DateTime<Local>>,
}

/// Everything that can happen to the console screen.
#[derive(Debug)]
pub enum ConsoleEvent {
    /// The directory answered a list request.
    ProductsLoaded(DirectoryResult<Vec<Product>>),
    /// A draft field changed.
    DraftEdited(DraftField, FieldEdit),
    /// The operator picked a product to edit.
    EditStarted(Product),
    /// The operator submitted the create/edit form.
    DraftSubmitted,
    /// The directory answered a create request.
    Created(DirectoryResult<Product>),
    /// The directory answered an update request.
    Updated(DirectoryResult<Product>),
    /// The operator asked to delete a row.
    DeleteRequested(i64),
    /// The directory answered a delete request.
    Deleted(DirectoryResult<()>),
    /// The operator started a trace on a row.
    TraceStarted(i64),
    /// The trace email changed.
    TraceEdited(FieldEdit),
    /// The operator submitted the trace.
    TraceSubmitted,
    /// The directory answered a trace request.
    TraceRecorded(DirectoryResult<()>),
}

/// Directory calls requested by the console screen.
#[derive(Debug, PartialEq)]
pub enum ConsoleCommand {
    LoadProducts,
    CreateProduct(NewProduct),
    UpdateProduct { product_id: i64, updates: NewProduct },
    DeleteProduct { product_id: i64 },
    RecordTrace(TraceRequest),
}

/// Fresh console state together with the mount-time fetch.
pub fn init() -> (ConsoleState, ConsoleCommand) {
    (ConsoleState::default(), ConsoleCommand::LoadProducts)
}

/// Advance the console screen by one event.
pub fn update(
    mut state: ConsoleState,
    event: ConsoleEvent,
) -> (ConsoleState, Option<ConsoleCommand>) {
    match event {
        ConsoleEvent::ProductsLoaded(Ok(products)) => {
            state.products = products;
            state.refreshed_at = Some(Local::now());
            if state.pending == PendingRefresh::Submit {
                state.draft = ProductForm::default();
                state.editing = None;
            }
            state.pending = PendingRefresh::None;
            (state, None)
        }
        ConsoleEvent::ProductsLoaded(Err(err)) => {
            log::error!("Failed to fetch products: {err}");
            // A refresh failing also fails the write it was settling, so the
            // draft stays put for another attempt.
            state.notice = Some(Notice::error(match state.pending {
                PendingRefresh::None => "Failed to fetch products",
                PendingRefresh::Submit => "Operation failed",
                PendingRefresh::Delete => "Failed to delete product",
            }));
            state.pending = PendingRefresh::None;
            (state, None)
        }
        ConsoleEvent::DraftEdited(field, edit) => {
            let buffer = match field {
                DraftField::Name => &mut state.draft.name,
                DraftField::Description => &mut state.draft.description,
                DraftField::Price => &mut state.draft.price,
            };
            edit.apply(buffer);
            (state, None)
        }
        ConsoleEvent::EditStarted(product) => {
            state.draft = ProductForm::from_product(&product);
            state.editing = Some(product);
            (state, None)
        }
        ConsoleEvent::DraftSubmitted => match state.draft.clone().into_new_product() {
            Ok(payload) => {
                let command = match &state.editing {
                    Some(product) => ConsoleCommand::UpdateProduct {
                        product_id: product.id,
                        updates: payload,
                    },
                    None => ConsoleCommand::CreateProduct(payload),
                };
                (state, Some(command))
            }
            Err(err) => {
                state.notice = Some(Notice::error(err.to_string()));
                (state, None)
            }
        },
        ConsoleEvent::Created(Ok(_)) | ConsoleEvent::Updated(Ok(_)) => {
            state.pending = PendingRefresh::Submit;
            (state, Some(ConsoleCommand::LoadProducts))
        }
        ConsoleEvent::Created(Err(err)) | ConsoleEvent::Updated(Err(err)) => {
            log::error!("Failed to save product: {err}");
            state.notice = Some(Notice::error("Operation failed"));
            (state, None)
        }
        ConsoleEvent::DeleteRequested(product_id) => {
            (state, Some(ConsoleCommand::DeleteProduct { product_id }))
        }
        ConsoleEvent::Deleted(Ok(())) => {
            state.pending = PendingRefresh::Delete;
            (state, Some(ConsoleCommand::LoadProducts))
        }
        ConsoleEvent::Deleted(Err(err)) => {
            log::error!("Failed to delete product: {err}");
            state.notice = Some(Notice::error("Failed to delete product"));
            (state, None)
        }
        ConsoleEvent::TraceStarted(product_id) => {
            // Retargeting another row starts over; reopening the same row
            // keeps what was typed.
            if state.trace.as_ref().map(|draft| draft.product_id) != Some(product_id) {
                state.trace = Some(TraceDraft::new(product_id));
            }
            (state, None)
        }
        ConsoleEvent::TraceEdited(edit) => {
            if let Some(draft) = &mut state.trace {
                edit.apply(&mut draft.email);
            }
            (state, None)
        }
        ConsoleEvent::TraceSubmitted => {
            let Some(draft) = &state.trace else {
                return (state, None);
            };

            match TraceForm::new(draft.email.clone()).into_trace_request(draft.product_id) {
                Ok(request) => (state, Some(ConsoleCommand::RecordTrace(request))),
                Err(TraceFormError::EmptyEmail) => {
                    state.notice = Some(Notice::error("Please enter an email"));
                    (state, None)
                }
                Err(TraceFormError::InvalidEmail { .. }) => {
                    state.notice = Some(Notice::error("Please enter a valid email address"));
                    (state, None)
                }
            }
        }
        ConsoleEvent::TraceRecorded(Ok(())) => {
            state.notice = Some(Notice::success("Product traced successfully"));
            state.trace = None;
            (state, None)
        }
        ConsoleEvent::TraceRecorded(Err(err)) => {
            log::error!("Failed to trace product: {err}");
            state.notice = Some(Notice::error("Failed to trace product"));
            (state, None)
        }
    }
}

/// Run one console command against the directory and report the outcome.
pub fn execute<D>(directory: &D, command: ConsoleCommand) -> ConsoleEvent
where
    D: ProductReader + ProductWriter + TraceRecorder + ?Sized,
{
    match command {
        ConsoleCommand::LoadProducts => ConsoleEvent::ProductsLoaded(directory.list_products()),
        ConsoleCommand::CreateProduct(payload) => {
            ConsoleEvent::Created(directory.create_product(&payload))
        }
        ConsoleCommand::UpdateProduct {
            product_id,
            updates,
        } => ConsoleEvent::Updated(directory.update_product(product_id, &updates)),
        ConsoleCommand::DeleteProduct { product_id } => {
            ConsoleEvent::Deleted(directory.delete_product(product_id))
        }
        ConsoleCommand::RecordTrace(request) => {
            ConsoleEvent::TraceRecorded(directory.record_trace(&request))
        }
    }
}

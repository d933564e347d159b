//! Helpers for integration tests.

use std::net::TcpListener;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};

use tracedesk::domain::product::{NewProduct, Product};
use tracedesk::domain::trace::TraceRequest;

/// Shared state behind the stub directory service.
#[derive(Default)]
struct StubState {
    products: Mutex<Vec<Product>>,
    traces: Mutex<Vec<TraceRequest>>,
    last_id: AtomicI64,
    fail_requests: AtomicBool,
}

impl StubState {
    fn next_id(&self) -> i64 {
        self.last_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn should_fail(&self) -> bool {
        self.fail_requests.load(Ordering::SeqCst)
    }
}

async fn list_products(state: web::Data<StubState>) -> HttpResponse {
    if state.should_fail() {
        return HttpResponse::InternalServerError().finish();
    }

    let products = state.products.lock().unwrap().clone();
    HttpResponse::Ok().json(products)
}

async fn create_product(
    state: web::Data<StubState>,
    payload: web::Json<NewProduct>,
) -> HttpResponse {
    if state.should_fail() {
        return HttpResponse::InternalServerError().finish();
    }

    let payload = payload.into_inner();
    let product = Product {
        id: state.next_id(),
        name: payload.name,
        description: payload.description,
        price: payload.price,
    };
    state.products.lock().unwrap().push(product.clone());

    HttpResponse::Created().json(product)
}

async fn update_product(
    state: web::Data<StubState>,
    path: web::Path<i64>,
    payload: web::Json<NewProduct>,
) -> HttpResponse {
    if state.should_fail() {
        return HttpResponse::InternalServerError().finish();
    }

    let product_id = path.into_inner();
    let payload = payload.into_inner();
    let mut products = state.products.lock().unwrap();

    match products.iter_mut().find(|product| product.id == product_id) {
        Some(product) => {
            product.name = payload.name;
            product.description = payload.description;
            product.price = payload.price;
            HttpResponse::Ok().json(product.clone())
        }
        None => HttpResponse::NotFound().finish(),
    }
}

async fn delete_product(state: web::Data<StubState>, path: web::Path<i64>) -> HttpResponse {
    if state.should_fail() {
        return HttpResponse::InternalServerError().finish();
    }

    let product_id = path.into_inner();
    let mut products = state.products.lock().unwrap();

    match products.iter().position(|product| product.id == product_id) {
        Some(index) => {
            products.remove(index);
            HttpResponse::NoContent().finish()
        }
        None => HttpResponse::NotFound().finish(),
    }
}

async fn record_trace(state: web::Data<StubState>, payload: web::Json<TraceRequest>) -> HttpResponse {
    if state.should_fail() {
        return HttpResponse::InternalServerError().finish();
    }

    let trace = payload.into_inner();
    let known = state
        .products
        .lock()
        .unwrap()
        .iter()
        .any(|product| product.id == trace.product_id);
    if !known {
        return HttpResponse::NotFound().finish();
    }

    state.traces.lock().unwrap().push(trace);
    HttpResponse::Created().finish()
}

/// In-memory stand-in for the product directory service, used by the
/// integration tests in place of the real backend.
pub struct StubDirectory {
    base_url: String,
    state: web::Data<StubState>,
    handle: ServerHandle,
    thread: Option<JoinHandle<std::io::Result<()>>>,
}

impl StubDirectory {
    /// Boot a stub service on an ephemeral port.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let address = listener.local_addr().expect("stub listener address");
        let state = web::Data::new(StubState::default());

        let app_state = state.clone();
        let (handle_tx, handle_rx) = mpsc::channel();

        let thread = thread::spawn(move || {
            let system = actix_web::rt::System::new();
            let server = HttpServer::new(move || {
                App::new().app_data(app_state.clone()).service(
                    web::scope("/api")
                        .route("/products", web::get().to(list_products))
                        .route("/products", web::post().to(create_product))
                        .route("/products/{id}", web::put().to(update_product))
                        .route("/products/{id}", web::delete().to(delete_product))
                        .route("/trace", web::post().to(record_trace)),
                )
            })
            .workers(1)
            .shutdown_timeout(1)
            .listen(listener)
            .expect("listen on stub socket")
            .run();

            handle_tx
                .send(server.handle())
                .expect("report server handle");
            system.block_on(server)
        });

        let handle = handle_rx.recv().expect("receive server handle");

        StubDirectory {
            base_url: format!("http://{address}/api"),
            state,
            handle,
            thread: Some(thread),
        }
    }

    /// Base URL the client under test should be pointed at.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Insert a product directly into the stub's store.
    pub fn seed_product(&self, name: &str, description: &str, price: f64) -> Product {
        let product = Product {
            id: self.state.next_id(),
            name: name.to_string(),
            description: description.to_string(),
            price,
        };
        self.state
            .products
            .lock()
            .expect("stub product store")
            .push(product.clone());
        product
    }

    /// Products currently held by the stub.
    pub fn products(&self) -> Vec<Product> {
        self.state.products.lock().expect("stub product store").clone()
    }

    /// Trace events the stub has accepted so far.
    pub fn traces(&self) -> Vec<TraceRequest> {
        self.state.traces.lock().expect("stub trace store").clone()
    }

    /// Make every endpoint answer with a 500 until switched back.
    pub fn fail_requests(&self, fail: bool) {
        self.state.fail_requests.store(fail, Ordering::SeqCst);
    }
}

impl Drop for StubDirectory {
    fn drop(&mut self) {
        actix_web::rt::System::new().block_on(self.handle.stop(true));
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

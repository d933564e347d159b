use mockall::mock;

use super::{DirectoryResult, ProductReader, ProductWriter, TraceRecorder};
use crate::domain::product::{NewProduct, Product};
use crate::domain::trace::TraceRequest;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn list_products(&self) -> DirectoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> DirectoryResult<Product>;
        fn update_product(&self, product_id: i64, updates: &NewProduct) -> DirectoryResult<Product>;
        fn delete_product(&self, product_id: i64) -> DirectoryResult<()>;
    }
}

mock! {
    pub TraceRecorder {}

    impl TraceRecorder for TraceRecorder {
        fn record_trace(&self, trace: &TraceRequest) -> DirectoryResult<()>;
    }
}

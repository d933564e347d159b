use crate::directory::{
    DirectoryResult, HttpDirectory, ProductReader, ProductWriter, expect_success,
};
use crate::domain::product::{NewProduct, Product};

impl ProductReader for HttpDirectory {
    fn list_products(&self) -> DirectoryResult<Vec<Product>> {
        let response = self.client.get(self.endpoint("/products")).send()?;
        let response = expect_success(response)?;

        Ok(response.json()?)
    }
}

impl ProductWriter for HttpDirectory {
    fn create_product(&self, new_product: &NewProduct) -> DirectoryResult<Product> {
        let response = self
            .client
            .post(self.endpoint("/products"))
            .json(new_product)
            .send()?;
        let response = expect_success(response)?;

        Ok(response.json()?)
    }

    fn update_product(&self, product_id: i64, updates: &NewProduct) -> DirectoryResult<Product> {
        let response = self
            .client
            .put(self.endpoint(&format!("/products/{product_id}")))
            .json(updates)
            .send()?;
        let response = expect_success(response)?;

        Ok(response.json()?)
    }

    fn delete_product(&self, product_id: i64) -> DirectoryResult<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/products/{product_id}")))
            .send()?;
        expect_success(response)?;

        Ok(())
    }
}

use crate::directory::{DirectoryResult, HttpDirectory, TraceRecorder, expect_success};
use crate::domain::trace::TraceRequest;

impl TraceRecorder for HttpDirectory {
    fn record_trace(&self, trace: &TraceRequest) -> DirectoryResult<()> {
        let response = self.client.post(self.endpoint("/trace")).json(trace).send()?;
        expect_success(response)?;

        Ok(())
    }
}

use std::future::Future;

use crate::backend::{Backend, BackendError};
use crate::reply::Reply;
use crate::server::Context;

pub trait Executable {
    fn exec<B: Backend>(
        self,
        ctx: &Context<B>,
    ) -> impl Future<Output = Result<Reply, BackendError>> + Send;
}

//! End-to-end cases against the live storefront, one module per suite.

pub mod api;
pub mod cart;
pub mod contact;
pub mod home;
pub mod login;
pub mod products;

use crate::driver::ElementHandle;
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;

/// Fresh address so repeated runs never collide on the shared site
pub(crate) fn unique_email(prefix: &str) -> String {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}.{}@storeprobe.test", &tag[..12])
}

/// Wait for `locator`; a miss is an assertion failure described by `missing`
pub(crate) async fn expect_present(
    session: &Session,
    locator: &Locator,
    missing: &str,
) -> ProbeResult<ElementHandle> {
    match session.find(locator).await {
        Err(ProbeError::ElementNotFound { .. }) => Err(ProbeError::assertion(missing)),
        other => other,
    }
}

/// Wait out the session timeout; `locator` appearing is an assertion failure
pub(crate) async fn expect_absent(session: &Session, locator: &Locator, appeared: &str) -> ProbeResult<()> {
    match session.find(locator).await {
        Ok(_) => Err(ProbeError::assertion(appeared)),
        Err(ProbeError::ElementNotFound { .. }) => Ok(()),
        Err(other) => Err(other),
    }
}

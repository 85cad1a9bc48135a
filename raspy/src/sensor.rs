//! High-level sensor interface

use bytes::Bytes;
use tracing::{debug, info, warn};

use raspy_core::{
    AckStatus, ProtocolViolation, Response, Session,
    constants::{COUNT_AMOUNT_SELECTOR, EIGENVALUE_LEN},
};
use raspy_transport::Transport;
use raspy_types::{
    CaptureTimeout, ComparisonLevel, DuplicateMode, Eigenvalues, Identification, Image,
    Permission, UserId, UserRecord,
};

use crate::directory;
use crate::error::{Error, Result};
use crate::request::{CountKind, EnrollStep, Request, Setting};
use crate::transfer::Link;

/// Fingerprint sensor session
///
/// Owns the transport for its whole lifetime. Every operation takes
/// `&mut self` and completes its exchange before returning, so at most one
/// request is ever in flight; share a sensor between tasks behind a mutex.
///
/// # Examples
///
/// ```no_run
/// use raspy::{Sensor, TcpTransport};
///
/// #[tokio::main]
/// async fn main() -> raspy::Result<()> {
///     let transport = TcpTransport::connect("192.168.1.50", 4001).await?;
///     let mut sensor = Sensor::new(transport);
///
///     let users = sensor.user_count().await?;
///     println!("{} users enrolled", users);
///
///     sensor.close().await?;
///     Ok(())
/// }
/// ```
pub struct Sensor {
    link: Link,
}

impl Sensor {
    /// Start a session over an open transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_boxed(Box::new(transport))
    }

    pub fn from_boxed(transport: Box<dyn Transport>) -> Self {
        info!("Opening sensor session on {}", transport.peer());

        Self {
            link: Link::new(transport),
        }
    }

    /// Session handle (state and counters)
    pub fn session(&self) -> Session {
        self.link.session().clone()
    }

    pub fn is_open(&self) -> bool {
        self.link.session().is_open()
    }

    /// Close the session and its transport
    pub async fn close(mut self) -> Result<()> {
        info!("Closing sensor session on {}", self.link.peer());
        self.link.close().await
    }

    /// Send one request and return the raw reply
    pub async fn execute(&mut self, request: &Request<'_>) -> Result<Response> {
        debug!("Executing {}", request.command());
        self.link.exchange(request).await
    }

    // Enrollment

    /// Send a single enrollment capture
    ///
    /// Use [`Sensor::enroll`] to run the whole sequence.
    pub async fn enroll_step(
        &mut self,
        step: EnrollStep,
        user: UserId,
        permission: Permission,
    ) -> Result<AckStatus> {
        self.status_of(Request::Enroll {
            step,
            user,
            permission,
        })
        .await
    }

    /// Fetch the eigenvalues of the fingerprint just enrolled
    pub async fn fetch_enrolled_template(&mut self) -> Result<Eigenvalues> {
        let response = self.value_of(Request::FetchEnrolledEigenvalues).await?;
        eigenvalues_from(&response)
    }

    // User management

    pub async fn delete_user(&mut self, user: UserId) -> Result<AckStatus> {
        self.status_of(Request::DeleteUser(user)).await
    }

    /// Delete every user holding `permission`, or all users for `None`
    pub async fn delete_users(&mut self, permission: Option<Permission>) -> Result<AckStatus> {
        self.status_of(Request::DeleteUsers(permission)).await
    }

    /// Number of enrolled users
    pub async fn user_count(&mut self) -> Result<u16> {
        let response = self.value_of(Request::Count(CountKind::Users)).await?;
        Ok(response.word())
    }

    /// The module's fingerprint amount figure
    ///
    /// On this branch the sensor echoes 0xFF in Q3 instead of a status.
    pub async fn fingerprint_amount(&mut self) -> Result<u16> {
        let response = self.execute(&Request::Count(CountKind::Amount)).await?;

        match response.status_byte() {
            COUNT_AMOUNT_SELECTOR => Ok(response.word()),
            code => match AckStatus::classify(code) {
                AckStatus::Success => Ok(response.word()),
                status => Err(Error::Status(status)),
            },
        }
    }

    pub async fn query_permission(&mut self, user: UserId) -> Result<Permission> {
        let response = self.execute(&Request::QueryPermission(user)).await?;

        match Permission::try_from(response.status_byte()) {
            Ok(permission) => Ok(permission),
            Err(_) => Err(refusal(response.status_byte())),
        }
    }

    /// Decode the full user table
    pub async fn users(&mut self) -> Result<Vec<UserRecord>> {
        let response = self.value_of(Request::QueryAllUsers).await?;
        let payload = response.payload.unwrap_or_default();

        let users = directory::decode_users(&payload)?;
        debug!("Sensor holds {} users", users.len());

        Ok(users)
    }

    // Comparison

    /// Capture a print and compare it with `user`'s template
    ///
    /// `Success` means the print matched.
    pub async fn compare_one_to_one(&mut self, user: UserId) -> Result<AckStatus> {
        self.status_of(Request::CompareOneToOne(user)).await
    }

    /// Capture a print and search every stored template
    pub async fn identify(&mut self) -> Result<Identification> {
        let response = self.execute(&Request::CompareOneToMany).await?;
        identification_from(&response)
    }

    // Capture

    /// Capture a print and return its eigenvalues
    pub async fn capture_eigenvalues(&mut self) -> Result<Eigenvalues> {
        let response = self.value_of(Request::CaptureEigenvalues).await?;
        eigenvalues_from(&response)
    }

    /// Capture a print and return the image
    pub async fn capture_image(&mut self) -> Result<Image> {
        let response = self.value_of(Request::CaptureImage).await?;
        let payload = response.payload.unwrap_or_default();

        Ok(Image::from_slice(&payload)?)
    }

    /// Put the module into sleep mode
    pub async fn sleep(&mut self) -> Result<AckStatus> {
        self.status_of(Request::Sleep).await
    }

    // Settings

    pub async fn comparison_level(&mut self) -> Result<ComparisonLevel> {
        let response = self
            .value_of(Request::ComparisonLevel(Setting::Query))
            .await?;
        Ok(ComparisonLevel::new(response.q2())?)
    }

    /// Set the comparison level
    ///
    /// Levels outside 0..=9 are rejected before anything is sent.
    pub async fn set_comparison_level(&mut self, level: u8) -> Result<AckStatus> {
        let level = ComparisonLevel::new(level)?;
        self.status_of(Request::ComparisonLevel(Setting::Set(level)))
            .await
    }

    pub async fn duplicate_mode(&mut self) -> Result<DuplicateMode> {
        let response = self
            .value_of(Request::DuplicateMode(Setting::Query))
            .await?;
        Ok(DuplicateMode::try_from(response.q2())?)
    }

    pub async fn set_duplicate_mode(&mut self, mode: DuplicateMode) -> Result<AckStatus> {
        self.status_of(Request::DuplicateMode(Setting::Set(mode)))
            .await
    }

    pub async fn capture_timeout(&mut self) -> Result<CaptureTimeout> {
        let response = self
            .value_of(Request::CaptureTimeout(Setting::Query))
            .await?;
        Ok(CaptureTimeout::from_ticks(response.q2()))
    }

    pub async fn set_capture_timeout(&mut self, timeout: CaptureTimeout) -> Result<AckStatus> {
        self.status_of(Request::CaptureTimeout(Setting::Set(timeout)))
            .await
    }

    // Template transfer

    /// Read a stored user together with its eigenvalues
    pub async fn upload_template(&mut self, user: UserId) -> Result<UserRecord> {
        let response = self.value_of(Request::UploadTemplate(user)).await?;
        let eigenvalues = eigenvalues_from(&response)?;

        let record = directory::decode_record(0, &eigenvalues.prefix())?;
        if record.id != user {
            warn!("Requested template of user {}, sensor sent {}", user, record.id);
        }

        Ok(record.with_eigenvalues(eigenvalues))
    }

    /// Store `eigenvalues` on the sensor under `user`
    pub async fn store_template(
        &mut self,
        user: UserId,
        permission: Permission,
        eigenvalues: &Eigenvalues,
    ) -> Result<AckStatus> {
        self.status_of(Request::StoreTemplate {
            user,
            permission,
            eigenvalues,
        })
        .await
    }

    /// Compare `eigenvalues` with `user`'s stored template
    pub async fn verify_template(
        &mut self,
        user: UserId,
        eigenvalues: &Eigenvalues,
    ) -> Result<AckStatus> {
        self.status_of(Request::VerifyTemplate { user, eigenvalues })
            .await
    }

    /// Search every stored template for `eigenvalues`
    pub async fn identify_template(&mut self, eigenvalues: &Eigenvalues) -> Result<Identification> {
        let response = self
            .execute(&Request::IdentifyTemplate(eigenvalues))
            .await?;
        identification_from(&response)
    }

    /// Capture a print and compare it with `eigenvalues`
    pub async fn match_template_live(&mut self, eigenvalues: &Eigenvalues) -> Result<AckStatus> {
        self.status_of(Request::MatchTemplateLive(eigenvalues))
            .await
    }

    // Helper methods

    async fn status_of(&mut self, request: Request<'_>) -> Result<AckStatus> {
        let response = self.execute(&request).await?;
        let status = response.status();

        debug!("{} -> {}", request.command(), status);
        Ok(status)
    }

    async fn value_of(&mut self, request: Request<'_>) -> Result<Response> {
        let response = self.execute(&request).await?;

        match response.status() {
            AckStatus::Success => Ok(response),
            status => {
                debug!("{} refused: {}", request.command(), status);
                Err(Error::Status(status))
            }
        }
    }
}

fn eigenvalues_from(response: &Response) -> Result<Eigenvalues> {
    let payload = response.payload.clone().unwrap_or_else(Bytes::new);

    if payload.len() != EIGENVALUE_LEN {
        return Err(ProtocolViolation::PayloadLength {
            expected: EIGENVALUE_LEN,
            actual: payload.len(),
        }
        .into());
    }

    Ok(Eigenvalues::from_slice(&payload)?)
}

/// Decode a 1:N reply: Q1:Q2 user id, Q3 permission or a status
fn identification_from(response: &Response) -> Result<Identification> {
    let code = response.status_byte();

    if let Ok(permission) = Permission::try_from(code) {
        let user = UserId::new(response.word()).map_err(|e| ProtocolViolation::InvalidRecord {
            index: 0,
            reason: e.to_string(),
        })?;
        return Ok(Identification::Match { user, permission });
    }

    match AckStatus::classify(code) {
        AckStatus::NoUser => Ok(Identification::NoMatch),
        _ => Err(refusal(code)),
    }
}

/// Error for a reply whose Q3 is not a usable value
fn refusal(code: u8) -> Error {
    match AckStatus::classify(code) {
        AckStatus::Success => {
            warn!("Sensor reported success without a value");
            Error::Status(AckStatus::Fail)
        }
        status => Error::Status(status),
    }
}

impl Drop for Sensor {
    fn drop(&mut self) {
        if self.is_open() {
            warn!("Sensor on {} dropped without close()", self.link.peer());
        }
    }
}

//! Enrollment and template-save workflows
//!
//! Both workflows share the first two captures and differ only in the
//! terminal action:
//!
//! ```text
//! Idle ──0x01──▶ Step1Sent ──0x02──▶ Step2Sent ──┬─0x03──▶ Step3Sent ──▶ Done
//!   │               │                  │          └─0x06──▶ TemplateRequested ──▶ Done
//!   └───────────────┴──── non-success ─┴──────────────────────────────────▶ Aborted
//! ```
//!
//! [`FinalStep::ThirdCaptureThenFetch`] takes the 0x03 branch and then
//! fetches the template. A non-success reply at any step aborts the run;
//! later steps are never sent.

use tracing::debug;

use raspy_core::AckStatus;
use raspy_types::{Eigenvalues, Permission, UserId};

use crate::error::{Error, Result};
use crate::request::EnrollStep;
use crate::sensor::Sensor;

/// Workflow position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollState {
    Idle,
    Step1Sent,
    Step2Sent,
    Step3Sent,
    TemplateRequested,
    Done,
    Aborted,
}

/// Action that follows the two shared captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalStep {
    /// Send the third enrollment capture (0x03)
    ThirdCapture,

    /// Fetch the template of the captured print (0x06)
    FetchTemplate,

    /// Third capture, then fetch the enrolled template (0x03, 0x06)
    ThirdCaptureThenFetch,
}

/// Outcome of a workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollReport {
    /// `Done` or `Aborted`
    pub state: EnrollState,

    /// Status of the last step sent
    pub status: AckStatus,

    /// Template fetched by the run, if it asked for one
    pub template: Option<Eigenvalues>,
}

impl EnrollReport {
    pub fn is_done(&self) -> bool {
        self.state == EnrollState::Done
    }
}

struct Enrollment {
    user: UserId,
    state: EnrollState,
}

impl Enrollment {
    fn new(user: UserId) -> Self {
        Self {
            user,
            state: EnrollState::Idle,
        }
    }

    fn advance(&mut self, next: EnrollState) {
        debug!("Enrollment of user {}: {:?} -> {:?}", self.user, self.state, next);
        self.state = next;
    }

    fn abort(&mut self, status: AckStatus) -> EnrollReport {
        debug!(
            "Enrollment of user {} aborted at {:?}: {}",
            self.user, self.state, status
        );
        self.state = EnrollState::Aborted;

        EnrollReport {
            state: self.state,
            status,
            template: None,
        }
    }

    fn done(&mut self, template: Option<Eigenvalues>) -> EnrollReport {
        self.advance(EnrollState::Done);

        EnrollReport {
            state: self.state,
            status: AckStatus::Success,
            template,
        }
    }
}

impl Sensor {
    /// Enroll a fingerprint with three captures
    ///
    /// Returns the status of the step that ended the run: `Success` when all
    /// three were accepted, otherwise the refusal (e.g. `DatabaseFull`,
    /// `UserAlreadyExists`, `Timeout`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use raspy::{AckStatus, Permission, Sensor, UserId};
    /// # async fn example(sensor: &mut Sensor) -> raspy::Result<()> {
    /// let user = UserId::new(12)?;
    /// match sensor.enroll(user, Permission::Level1).await? {
    ///     AckStatus::Success => println!("Enrolled {}", user),
    ///     status => println!("Enrollment refused: {}", status),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn enroll(&mut self, user: UserId, permission: Permission) -> Result<AckStatus> {
        let report = self
            .run_enrollment(user, permission, FinalStep::ThirdCapture)
            .await?;
        Ok(report.status)
    }

    /// Enroll with three captures, then fetch the new template
    ///
    /// The template is only exposed when it is exactly 193 bytes; any other
    /// length is returned as a protocol violation.
    pub async fn enroll_with_template(
        &mut self,
        user: UserId,
        permission: Permission,
    ) -> Result<EnrollReport> {
        self.run_enrollment(user, permission, FinalStep::ThirdCaptureThenFetch)
            .await
    }

    /// Capture twice and fetch the template without the third capture
    pub async fn capture_template(
        &mut self,
        user: UserId,
        permission: Permission,
    ) -> Result<EnrollReport> {
        self.run_enrollment(user, permission, FinalStep::FetchTemplate)
            .await
    }

    /// Run the shared two captures followed by `last`
    pub async fn run_enrollment(
        &mut self,
        user: UserId,
        permission: Permission,
        last: FinalStep,
    ) -> Result<EnrollReport> {
        let mut tracker = Enrollment::new(user);

        if let Some(aborted) = self.shared_steps(&mut tracker, permission).await? {
            return Ok(aborted);
        }

        match last {
            FinalStep::ThirdCapture => Ok(self
                .third_capture(&mut tracker, permission)
                .await?
                .unwrap_or_else(|| tracker.done(None))),
            FinalStep::FetchTemplate => self.fetch(&mut tracker).await,
            FinalStep::ThirdCaptureThenFetch => {
                match self.third_capture(&mut tracker, permission).await? {
                    Some(aborted) => Ok(aborted),
                    None => self.fetch(&mut tracker).await,
                }
            }
        }
    }

    async fn shared_steps(
        &mut self,
        tracker: &mut Enrollment,
        permission: Permission,
    ) -> Result<Option<EnrollReport>> {
        for (step, state) in [
            (EnrollStep::First, EnrollState::Step1Sent),
            (EnrollStep::Second, EnrollState::Step2Sent),
        ] {
            if let Some(aborted) = self.capture(tracker, permission, step, state).await? {
                return Ok(Some(aborted));
            }
        }
        Ok(None)
    }

    /// Third capture; `Some` when it aborted the run
    async fn third_capture(
        &mut self,
        tracker: &mut Enrollment,
        permission: Permission,
    ) -> Result<Option<EnrollReport>> {
        self.capture(tracker, permission, EnrollStep::Third, EnrollState::Step3Sent)
            .await
    }

    async fn capture(
        &mut self,
        tracker: &mut Enrollment,
        permission: Permission,
        step: EnrollStep,
        state: EnrollState,
    ) -> Result<Option<EnrollReport>> {
        tracker.advance(state);
        let status = self.enroll_step(step, tracker.user, permission).await?;

        Ok((!status.is_success()).then(|| tracker.abort(status)))
    }

    async fn fetch(&mut self, tracker: &mut Enrollment) -> Result<EnrollReport> {
        tracker.advance(EnrollState::TemplateRequested);

        match self.fetch_enrolled_template().await {
            Ok(template) => Ok(tracker.done(Some(template))),
            Err(Error::Status(status)) => Ok(tracker.abort(status)),
            Err(e) => {
                tracker.advance(EnrollState::Aborted);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use pretty_assertions::assert_eq;

    fn user(id: u16) -> UserId {
        UserId::new(id).unwrap()
    }

    fn sensor() -> (Sensor, ScriptedTransport) {
        let transport = ScriptedTransport::new();
        (Sensor::new(transport.clone()), transport)
    }

    fn commands(transport: &ScriptedTransport) -> Vec<u8> {
        transport.sent().iter().map(|frame| frame[1]).collect()
    }

    #[tokio::test]
    async fn test_database_full_stops_after_first_step() {
        let (mut sensor, transport) = sensor();
        transport.reply_frame(0x01, [0, 0, 0x04]);

        let status = sensor.enroll(user(1), Permission::Level1).await.unwrap();

        assert_eq!(status, AckStatus::DatabaseFull);
        assert_eq!(transport.writes(), 1);
        assert_eq!(commands(&transport), vec![0x01]);
    }

    #[tokio::test]
    async fn test_enroll_full_sequence() {
        let (mut sensor, transport) = sensor();
        for command in [0x01, 0x02, 0x03] {
            transport.reply_frame(command, [0, 0, 0]);
        }

        let status = sensor.enroll(user(0x0105), Permission::Level2).await.unwrap();

        assert_eq!(status, AckStatus::Success);
        assert_eq!(commands(&transport), vec![0x01, 0x02, 0x03]);
        for frame in transport.sent() {
            assert_eq!(&frame[2..5], &[0x01, 0x05, 0x02]);
        }
    }

    #[tokio::test]
    async fn test_enroll_aborts_at_second_step() {
        let (mut sensor, transport) = sensor();
        transport.reply_frame(0x01, [0, 0, 0]);
        transport.reply_frame(0x02, [0, 0, 0x07]);

        let report = sensor
            .run_enrollment(user(3), Permission::Level1, FinalStep::ThirdCapture)
            .await
            .unwrap();

        assert_eq!(report.state, EnrollState::Aborted);
        assert_eq!(report.status, AckStatus::FingerprintAlreadyExists);
        assert_eq!(commands(&transport), vec![0x01, 0x02]);
    }

    #[tokio::test]
    async fn test_enroll_with_template() {
        let (mut sensor, transport) = sensor();
        for command in [0x01, 0x02, 0x03] {
            transport.reply_frame(command, [0, 0, 0]);
        }
        transport.reply_packet(0x06, &[0x5A; 193]);

        let report = sensor
            .enroll_with_template(user(8), Permission::Level3)
            .await
            .unwrap();

        assert!(report.is_done());
        assert_eq!(report.template.unwrap().body(), &[0x5A; 190][..]);
        assert_eq!(commands(&transport), vec![0x01, 0x02, 0x03, 0x06]);
    }

    #[tokio::test]
    async fn test_capture_template_skips_third_step() {
        let (mut sensor, transport) = sensor();
        transport.reply_frame(0x01, [0, 0, 0]);
        transport.reply_frame(0x02, [0, 0, 0]);
        transport.reply_packet(0x06, &[0x11; 193]);

        let report = sensor
            .capture_template(user(4), Permission::Level1)
            .await
            .unwrap();

        assert_eq!(report.state, EnrollState::Done);
        assert!(report.template.is_some());
        assert_eq!(commands(&transport), vec![0x01, 0x02, 0x06]);
    }

    #[tokio::test]
    async fn test_wrong_template_length_returns_no_template() {
        let (mut sensor, transport) = sensor();
        transport.reply_frame(0x01, [0, 0, 0]);
        transport.reply_frame(0x02, [0, 0, 0]);
        transport.reply_packet(0x06, &[0x11; 192]);

        let err = sensor
            .capture_template(user(4), Permission::Level1)
            .await
            .unwrap_err();

        assert!(err.is_protocol_violation());
        assert_eq!(transport.pending(), 0);
    }

    #[tokio::test]
    async fn test_template_fetch_refused() {
        let (mut sensor, transport) = sensor();
        transport.reply_frame(0x01, [0, 0, 0]);
        transport.reply_frame(0x02, [0, 0, 0]);
        transport.reply_frame(0x06, [0, 0, 0x08]);

        let report = sensor
            .capture_template(user(4), Permission::Level1)
            .await
            .unwrap();

        assert_eq!(report.state, EnrollState::Aborted);
        assert_eq!(report.status, AckStatus::Timeout);
        assert_eq!(report.template, None);
    }

    #[tokio::test]
    async fn test_third_step_refusal_skips_template_fetch() {
        let (mut sensor, transport) = sensor();
        transport.reply_frame(0x01, [0, 0, 0]);
        transport.reply_frame(0x02, [0, 0, 0]);
        transport.reply_frame(0x03, [0, 0, 0x06]);

        let report = sensor
            .enroll_with_template(user(5), Permission::Level1)
            .await
            .unwrap();

        assert_eq!(
            report,
            EnrollReport {
                state: EnrollState::Aborted,
                status: AckStatus::UserAlreadyExists,
                template: None,
            }
        );
        assert_eq!(transport.writes(), 3);
        assert_eq!(commands(&transport), vec![0x01, 0x02, 0x03]);
    }
}

// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push-notification delivery collaborator.

use async_trait::async_trait;

use crate::error::PetsimError;
use crate::notification::Notification;
use crate::traits::adapter::PluginAdapter;

/// Best-effort push transport. Failures are reported but never remove the
/// notification from the in-app set.
#[async_trait]
pub trait PushDelivery: PluginAdapter {
    async fn deliver(&self, notification: &Notification) -> Result<(), PetsimError>;
}

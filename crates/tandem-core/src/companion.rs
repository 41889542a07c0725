//! Companion ("master") app reachability probe and hand-off.
//!
//! The companion app is the account holder: it establishes the credential
//! bundle this app picks up. Reachability is a URL-scheme capability check;
//! when the scheme is unsupported the app-store page is opened instead.

use crate::error::Result;
use crate::reconcile::CompanionGate;

pub const IOS_COMPANION_URL: &str = "baseShareUrlScheme://app";
pub const IOS_APP_STORE_URL: &str = "itms-apps://itunes.apple.com/us/app/id1365505175?mt=8";

pub const ANDROID_COMPANION_URL: &str = "vn.base.message://vn.base.message";
pub const ANDROID_PLAY_STORE_URL: &str = "market://details?id=vn.base.message";

/// OS URL opener. Implemented by the shells over the platform linking API.
#[allow(async_fn_in_trait)]
pub trait LinkOpener {
    /// Whether any installed app claims this URL.
    async fn can_open(&self, url: &str) -> Result<bool>;
    async fn open(&self, url: &str) -> Result<()>;
}

/// Opener for platforms without a companion-app architecture.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLink;

impl LinkOpener for NoLink {
    async fn can_open(&self, _url: &str) -> Result<bool> {
        Ok(false)
    }

    async fn open(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}

/// A companion app addressed by its custom URL scheme, with a store page as
/// fallback destination.
#[derive(Debug, Clone)]
pub struct CompanionApp<L: LinkOpener> {
    scheme_url: String,
    store_url: String,
    opener: L,
}

impl<L: LinkOpener> CompanionApp<L> {
    pub fn new(scheme_url: impl Into<String>, store_url: impl Into<String>, opener: L) -> Self {
        Self {
            scheme_url: scheme_url.into(),
            store_url: store_url.into(),
            opener,
        }
    }

    pub fn ios(opener: L) -> Self {
        Self::new(IOS_COMPANION_URL, IOS_APP_STORE_URL, opener)
    }

    pub fn android(opener: L) -> Self {
        Self::new(ANDROID_COMPANION_URL, ANDROID_PLAY_STORE_URL, opener)
    }

    /// Probe the custom scheme; any error reads as "not installed".
    pub async fn is_installed(&self) -> bool {
        self.opener
            .can_open(&self.scheme_url)
            .await
            .unwrap_or(false)
    }

    pub async fn gate(&self) -> CompanionGate {
        if self.is_installed().await {
            CompanionGate::Installed
        } else {
            CompanionGate::NotInstalled
        }
    }

    /// Hand off to the companion app, or to its store page when the scheme
    /// is unsupported or the probe fails.
    pub async fn open(&self) -> Result<()> {
        match self.opener.can_open(&self.scheme_url).await {
            Ok(true) => self.opener.open(&self.scheme_url).await,
            Ok(false) | Err(_) => self.opener.open(&self.store_url).await,
        }
    }
}

//! Reactive dashboard wiring
//!
//! A [`SelectionControl`] publishes the selected place name, a
//! [`DisplaySurface`] holds whatever is currently shown, and [`bind`]
//! subscribes one to the other: every selection change runs the render
//! pipeline and replaces the surface content.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{DashboardConfig, OfficeMapConfig};
use crate::locator::AddressSearch;
use crate::models::{DisplayObject, MapSettings};
use crate::render::render;
use crate::{OfficeMapError, Result};

/// Current value of the selection control.
///
/// `revision` goes up by one on every accepted change, so a display state
/// can be matched to the selection that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySelection {
    pub value: String,
    pub revision: u64,
}

/// Selection control with a fixed set of options
pub struct SelectionControl {
    name: String,
    options: Vec<String>,
    sender: watch::Sender<QuerySelection>,
}

impl SelectionControl {
    pub fn new(name: impl Into<String>, options: Vec<String>, default: &str) -> Result<Self> {
        if !options.iter().any(|option| option == default) {
            return Err(OfficeMapError::validation(format!(
                "'{default}' is not one of the available options"
            )));
        }

        let (sender, _) = watch::channel(QuerySelection {
            value: default.to_string(),
            revision: 0,
        });

        Ok(Self {
            name: name.into(),
            options,
            sender,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(
            config.control_name.clone(),
            config.options.clone(),
            &config.default_option,
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn selection(&self) -> QuerySelection {
        self.sender.borrow().clone()
    }

    /// Change the selected value and return the resulting revision.
    ///
    /// Selecting the current value again changes nothing and notifies no one.
    pub fn select(&self, value: &str) -> Result<u64> {
        if !self.options.iter().any(|option| option == value) {
            return Err(OfficeMapError::validation(format!(
                "'{}' is not one of: {}",
                value,
                self.options.join(", ")
            )));
        }

        let mut revision = 0;
        self.sender.send_if_modified(|current| {
            if current.value == value {
                revision = current.revision;
                false
            } else {
                current.value = value.to_string();
                current.revision += 1;
                revision = current.revision;
                true
            }
        });

        Ok(revision)
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuerySelection> {
        self.sender.subscribe()
    }
}

/// What the display surface currently shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DisplayState {
    /// Nothing rendered yet
    Pending,
    Ready {
        revision: u64,
        object: DisplayObject,
    },
    Failed {
        revision: u64,
        place: String,
        message: String,
        #[serde(skip_serializing)]
        error: OfficeMapError,
    },
}

impl DisplayState {
    /// Revision of the selection this state was rendered for
    #[must_use]
    pub fn revision(&self) -> Option<u64> {
        match self {
            DisplayState::Pending => None,
            DisplayState::Ready { revision, .. } | DisplayState::Failed { revision, .. } => {
                Some(*revision)
            }
        }
    }

    #[must_use]
    pub fn object(&self) -> Option<&DisplayObject> {
        match self {
            DisplayState::Ready { object, .. } => Some(object),
            _ => None,
        }
    }
}

/// Holds the current display state; every update replaces it wholesale
pub struct DisplaySurface {
    sender: watch::Sender<DisplayState>,
}

impl Default for DisplaySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(DisplayState::Pending);
        Self { sender }
    }

    pub fn replace(&self, state: DisplayState) {
        self.sender.send_replace(state);
    }

    #[must_use]
    pub fn current(&self) -> DisplayState {
        self.sender.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.sender.subscribe()
    }

    /// Wait until the surface shows a selection revision of at least `revision`
    pub async fn wait_for_revision(&self, revision: u64) -> DisplayState {
        let mut receiver = self.sender.subscribe();
        let waited = receiver
            .wait_for(|state| state.revision().is_some_and(|shown| shown >= revision))
            .await
            .map(|state| state.clone());

        // The sender lives in `self`, so the channel cannot close while we wait.
        waited.unwrap_or_else(|_| self.current())
    }
}

/// Run the pipeline for one selection and replace the surface content
async fn refresh(
    locator: &dyn AddressSearch,
    surface: &DisplaySurface,
    selection: &QuerySelection,
    settings: &MapSettings,
) {
    info!(
        "Selection '{}' (revision {}) triggered a render",
        selection.value, selection.revision
    );

    let state = match render(locator, &selection.value, settings).await {
        Ok(object) => DisplayState::Ready {
            revision: selection.revision,
            object,
        },
        Err(error) => {
            warn!("Render for '{}' failed: {}", selection.value, error);
            DisplayState::Failed {
                revision: selection.revision,
                place: selection.value.clone(),
                message: error.user_message(),
                error,
            }
        }
    };

    surface.replace(state);
}

/// Subscribe the surface to the control.
///
/// Renders the current value immediately, then once per change until the
/// control is dropped. Changes that arrive during a render coalesce into
/// one run for the latest value.
pub fn bind(
    control: &SelectionControl,
    surface: Arc<DisplaySurface>,
    locator: Arc<dyn AddressSearch>,
    settings: MapSettings,
) -> JoinHandle<()> {
    let mut selection = control.subscribe();

    tokio::spawn(async move {
        loop {
            let current = selection.borrow_and_update().clone();
            refresh(locator.as_ref(), &surface, &current, &settings).await;

            if selection.changed().await.is_err() {
                break;
            }
        }
    })
}

/// Control, surface and their binding, created once at startup
pub struct Dashboard {
    control: SelectionControl,
    surface: Arc<DisplaySurface>,
    locator: Arc<dyn AddressSearch>,
    settings: MapSettings,
    binding: JoinHandle<()>,
}

impl Dashboard {
    /// Wire up the dashboard. Must be called from within a tokio runtime.
    pub fn start(config: &OfficeMapConfig, locator: Arc<dyn AddressSearch>) -> Result<Self> {
        let control = SelectionControl::from_config(&config.dashboard)?;
        let surface = Arc::new(DisplaySurface::new());
        let settings = config.map;

        let binding = bind(&control, Arc::clone(&surface), Arc::clone(&locator), settings);

        Ok(Self {
            control,
            surface,
            locator,
            settings,
            binding,
        })
    }

    #[must_use]
    pub fn control(&self) -> &SelectionControl {
        &self.control
    }

    #[must_use]
    pub fn surface(&self) -> &DisplaySurface {
        &self.surface
    }

    #[must_use]
    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Change the selection and wait for the render it triggers
    pub async fn select(&self, place: &str) -> Result<DisplayState> {
        let revision = self.control.select(place)?;
        Ok(self.surface.wait_for_revision(revision).await)
    }

    /// Render any place without touching the control or the surface
    pub async fn render(&self, place: &str) -> Result<DisplayObject> {
        render(self.locator.as_ref(), place, &self.settings).await
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.binding.abort();
    }
}

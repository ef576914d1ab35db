//! View / create / edit modal controller

use std::sync::Arc;

use serde::Serialize;

use super::CatalogContext;
use crate::error::{CoreError, CoreResult};
use crate::traits::ListRefresh;
use crate::types::{
    AppMode, CreateMarketAppRequest, MarketApp, MessageKey, Notification, SourceApp, TagSet,
    UpdateMarketAppRequest,
};

/// Modal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorState {
    #[default]
    Closed,
    Viewing,
    Creating,
    Editing,
}

/// What to open the modal on
#[derive(Debug, Clone)]
pub enum OpenRequest {
    View(MarketApp),
    Edit(MarketApp),
    /// Publish a workspace app as a new entry
    Create(SourceApp),
}

/// A single form field change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorField {
    Name(String),
    Description(String),
    Important(bool),
}

/// Working copy of the editable fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorFormData {
    pub name: String,
    pub description: String,
    pub important: bool,
}

impl EditorFormData {
    fn from_app(app: &MarketApp) -> Self {
        Self {
            name: app.name.clone(),
            description: app.description.clone(),
            important: app.important,
        }
    }
}

/// Result of [`EditorStateMachine::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Saved; the modal is closed
    Saved(MarketApp),
    /// Rejected locally (blank name); nothing was sent
    Invalid,
    /// The catalog API failed; the session is untouched
    Failed(CoreError),
}

/// Result of [`EditorStateMachine::take_into_workspace`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TakeOutcome {
    Copied,
    /// Result code or error message
    Failed(String),
}

/// Read-only view for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub state: EditorState,
    pub mode: Option<AppMode>,
    pub form: EditorFormData,
    pub tags: Vec<String>,
    pub tag_draft: String,
    pub important_editable: bool,
    pub is_read_only: bool,
}

#[derive(Debug, Clone)]
enum EditTarget {
    Existing(MarketApp),
    Source(SourceApp),
}

impl EditTarget {
    fn mode(&self) -> AppMode {
        match self {
            Self::Existing(app) => app.mode,
            Self::Source(source) => source.mode,
        }
    }
}

#[derive(Debug, Clone)]
struct EditorSession {
    target: EditTarget,
    form: EditorFormData,
    tags: TagSet,
    tag_draft: String,
}

/// Editor state machine
///
/// One instance per modal. Mutating operations take `&mut self`; the presentation
/// layer owns the instance.
pub struct EditorStateMachine {
    ctx: Arc<CatalogContext>,
    list: Arc<dyn ListRefresh>,
    state: EditorState,
    session: Option<EditorSession>,
}

impl EditorStateMachine {
    #[must_use]
    pub fn new(ctx: Arc<CatalogContext>, list: Arc<dyn ListRefresh>) -> Self {
        Self {
            ctx,
            list,
            state: EditorState::Closed,
            session: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Open the modal, superseding any open session.
    ///
    /// `Edit` by an actor that may not manage the entry opens read-only.
    pub fn open(&mut self, request: OpenRequest) -> EditorState {
        let (state, session) = match request {
            OpenRequest::View(app) => (EditorState::Viewing, Self::session_for(app)),
            OpenRequest::Edit(app) => {
                let state = if self.ctx.permissions.can_manage(&app) {
                    EditorState::Editing
                } else {
                    log::warn!(
                        "Actor {} may not edit market app {}, opening read-only",
                        self.ctx.permissions.current_actor_id(),
                        app.id
                    );
                    EditorState::Viewing
                };
                (state, Self::session_for(app))
            }
            OpenRequest::Create(source) => (
                EditorState::Creating,
                EditorSession {
                    tags: TagSet::new(source.mode),
                    target: EditTarget::Source(source),
                    form: EditorFormData::default(),
                    tag_draft: String::new(),
                },
            ),
        };
        self.state = state;
        self.session = Some(session);
        state
    }

    fn session_for(app: MarketApp) -> EditorSession {
        EditorSession {
            form: EditorFormData::from_app(&app),
            tags: TagSet::for_app(&app),
            target: EditTarget::Existing(app),
            tag_draft: String::new(),
        }
    }

    fn is_writable(&self) -> bool {
        matches!(self.state, EditorState::Creating | EditorState::Editing)
    }

    fn writable_session(&mut self) -> CoreResult<&mut EditorSession> {
        if !self.is_writable() {
            return Err(CoreError::InvalidState(format!(
                "Editor is {:?}, fields are read-only",
                self.state
            )));
        }
        self.session
            .as_mut()
            .ok_or_else(|| CoreError::InvalidState("No editor session".to_string()))
    }

    /// Whether the `important` flag may be changed by the acting actor
    #[must_use]
    pub fn important_editable(&self) -> bool {
        self.is_writable() && self.ctx.permissions.is_market_admin()
    }

    pub fn set_field(&mut self, field: EditorField) -> CoreResult<()> {
        if matches!(field, EditorField::Important(_)) && !self.ctx.permissions.is_market_admin()
        {
            return Err(CoreError::PermissionDenied(
                "Only catalog administrators can change the important flag".to_string(),
            ));
        }
        let session = self.writable_session()?;
        match field {
            EditorField::Name(name) => session.form.name = name,
            EditorField::Description(description) => session.form.description = description,
            EditorField::Important(important) => session.form.important = important,
        }
        Ok(())
    }

    /// Returns whether the tag was added (blank and duplicate input are no-ops)
    pub fn add_tag(&mut self, text: &str) -> CoreResult<bool> {
        Ok(self.writable_session()?.tags.add(text))
    }

    /// Fails for the derived tag
    pub fn remove_tag(&mut self, text: &str) -> CoreResult<bool> {
        self.writable_session()?.tags.remove(text)
    }

    pub fn set_tag_draft(&mut self, text: &str) -> CoreResult<()> {
        self.writable_session()?.tag_draft = text.to_string();
        Ok(())
    }

    /// Add the draft as a tag; the draft is cleared only when the tag was added
    pub fn commit_tag_draft(&mut self) -> CoreResult<bool> {
        let session = self.writable_session()?;
        let added = session.tags.add(&session.tag_draft);
        if added {
            session.tag_draft.clear();
        }
        Ok(added)
    }

    /// Validate and send the form.
    ///
    /// Collaborator failures are reported through the notifier and returned as
    /// [`SubmitOutcome::Failed`]; `Err` is reserved for calling in the wrong state.
    pub async fn submit(&mut self) -> CoreResult<SubmitOutcome> {
        let session = self.writable_session()?.clone();
        let name = session.form.name.trim();
        if name.is_empty() {
            self.ctx
                .notifier
                .notify(Notification::error(MessageKey::NameNotEmpty));
            return Ok(SubmitOutcome::Invalid);
        }

        let (result, success_key, failure_key) = match session.target {
            EditTarget::Source(ref source) => {
                let request = CreateMarketAppRequest {
                    app_id: source.id.clone(),
                    name: name.to_string(),
                    description: session.form.description.clone(),
                    mode: source.mode,
                    tags: session.tags.to_vec(),
                    important: session.form.important,
                };
                (
                    self.ctx.api.create_app(&request).await,
                    MessageKey::AppCreated,
                    MessageKey::AppCreateFailed,
                )
            }
            EditTarget::Existing(ref app) => {
                let request = UpdateMarketAppRequest {
                    name: Some(name.to_string()),
                    description: Some(session.form.description.clone()),
                    tags: Some(session.tags.to_vec()),
                    important: Some(session.form.important),
                };
                (
                    self.ctx.api.update_app(&app.id, &request).await,
                    MessageKey::ModifiedSuccessfully,
                    MessageKey::ModifiedUnsuccessfully,
                )
            }
        };

        match result {
            Ok(saved) => {
                log::info!(
                    "Market app {} saved ({})",
                    saved.id,
                    session.target.mode()
                );
                self.ctx.notifier.notify(Notification::success(success_key));
                self.list.refresh().await;
                self.ctx.refresh_signal.publish().await;
                self.close();
                Ok(SubmitOutcome::Saved(saved))
            }
            Err(e) => {
                e.log("Failed to save market app");
                self.ctx
                    .notifier
                    .notify(Notification::error(failure_key).with_detail(e.user_message()));
                Ok(SubmitOutcome::Failed(e))
            }
        }
    }

    /// Copy the viewed entry into the actor's workspace
    pub async fn take_into_workspace(&mut self, id: &str) -> CoreResult<TakeOutcome> {
        if self.state != EditorState::Viewing {
            return Err(CoreError::InvalidState(format!(
                "Take into workspace needs the viewer, editor is {:?}",
                self.state
            )));
        }

        let failure = match self.ctx.api.clone_to_workspace(id).await {
            Ok(outcome) if outcome.is_success() => {
                log::info!("Market app {id} copied to workspace");
                self.ctx
                    .notifier
                    .notify(Notification::success(MessageKey::ToMyWorkspaceSuccess));
                self.close();
                return Ok(TakeOutcome::Copied);
            }
            Ok(outcome) => {
                log::warn!("Copying market app {id} returned '{}'", outcome.result);
                outcome.result
            }
            Err(e) => {
                e.log("Failed to copy market app to workspace");
                e.user_message()
            }
        };
        self.ctx.notifier.notify(
            Notification::error(MessageKey::ToMyWorkspaceFailed).with_detail(failure.clone()),
        );
        Ok(TakeOutcome::Failed(failure))
    }

    /// Discard the session without side effects
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.state = EditorState::Closed;
        self.session = None;
    }

    #[must_use]
    pub fn snapshot(&self) -> EditorSnapshot {
        let (mode, form, tags, tag_draft) = match self.session {
            Some(ref s) => (
                Some(s.target.mode()),
                s.form.clone(),
                s.tags.to_vec(),
                s.tag_draft.clone(),
            ),
            None => (None, EditorFormData::default(), Vec::new(), String::new()),
        };
        EditorSnapshot {
            state: self.state,
            mode,
            form,
            tags,
            tag_draft,
            important_editable: self.important_editable(),
            is_read_only: !self.is_writable(),
        }
    }
}

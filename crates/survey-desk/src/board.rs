//! Survey management board.
//!
//! Holds the "all surveys" and "my surveys" snapshots, the table filters and
//! the quick-edit dialog. The board never patches a survey locally: every
//! successful mutation is followed by [`SurveyBoard::refresh`], and what is
//! displayed is always the last complete refetch.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use survey_auth::session::Session;
use survey_client::SurveyService;
use survey_core::filter::{
    filter_surveys, FilterState, GenderFilter, IdSelection, OwnerScope, StatusFilter,
};
use survey_core::metrics::SurveyMetrics;
use survey_core::models::Survey;
use survey_core::quick_edit::{
    build_update_payload, validate_edit_draft, EditDraft, EditableFields,
};

use crate::error::DeskError;
use crate::notice::Notice;

const UPDATE_FALLBACK: &str = "Failed to update survey";
const FETCH_FALLBACK: &str = "Failed to load surveys";

/// Result of a [`SurveyBoard::refresh`] that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Both lists were replaced.
    Applied,
    /// A newer refresh started, or the board was closed, before this one
    /// resolved. Its results were dropped.
    Stale,
}

#[derive(Debug, Clone)]
struct QuickEditDialog {
    /// Distinguishes reopenings of the same survey.
    serial: u64,
    survey: Survey,
    draft: EditDraft,
    editable: EditableFields,
    saving: bool,
}

#[derive(Debug, Default)]
struct BoardState {
    all: Vec<Survey>,
    mine: Vec<Survey>,
    filters: FilterState,
    /// Summary card currently highlighted as a quick filter.
    active_card: StatusFilter,
    dialog: Option<QuickEditDialog>,
    notices: Vec<Notice>,
    loading: bool,
    generation: u64,
    dialogs_opened: u64,
    closed: bool,
}

impl BoardState {
    fn active_list(&self) -> &[Survey] {
        match self.filters.owner_scope {
            OwnerScope::All => &self.all,
            OwnerScope::Mine => &self.mine,
        }
    }

    fn find_survey(&self, survey_id: i64) -> Option<&Survey> {
        self.active_list()
            .iter()
            .chain(self.all.iter())
            .chain(self.mine.iter())
            .find(|survey| survey.survey_id == survey_id)
    }
}

/// Quick-edit dialog as a view renders it.
#[derive(Debug, Clone, Serialize)]
pub struct DialogView {
    pub survey_id: i64,
    pub title: String,
    pub draft: EditDraft,
    /// Inputs to enable. The payload builder applies the same rule.
    pub editable: EditableFields,
    pub saving: bool,
}

/// Everything a survey management view renders.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub surveys: Vec<Survey>,
    pub metrics: SurveyMetrics,
    pub filters: FilterState,
    pub active_card: StatusFilter,
    pub dialog: Option<DialogView>,
    pub loading: bool,
}

/// Handle to a survey management board. Clones share the same state.
pub struct SurveyBoard<S> {
    service: Arc<S>,
    session: Session,
    state: Arc<Mutex<BoardState>>,
}

impl<S> Clone for SurveyBoard<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            session: self.session.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> std::fmt::Debug for SurveyBoard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveyBoard").finish_non_exhaustive()
    }
}

impl<S: SurveyService> SurveyBoard<S> {
    /// Board for a signed-in admin or teacher.
    pub fn new(service: S, session: Session) -> Result<Self, DeskError> {
        if !session.role.manages_surveys() {
            return Err(DeskError::NotPermitted(session.role));
        }
        Ok(Self {
            service: Arc::new(service),
            session,
            state: Arc::new(Mutex::new(BoardState::default())),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Refetch both lists concurrently and swap them in together.
    ///
    /// On failure the previous snapshots stay in place and one error notice
    /// is recorded.
    pub async fn refresh(&self) -> Result<RefreshOutcome, DeskError> {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.loading = true;
            state.generation
        };
        debug!(generation, "refreshing survey lists");

        let fetched = tokio::try_join!(
            self.service.all_surveys(&self.session),
            self.service.my_surveys(&self.session),
        );

        let mut state = self.state.lock().await;
        if state.closed || state.generation != generation {
            debug!(generation, current = state.generation, "dropping stale refresh");
            return Ok(RefreshOutcome::Stale);
        }
        state.loading = false;

        match fetched {
            Ok((all, mine)) => {
                info!(all = all.len(), mine = mine.len(), "survey lists refreshed");
                state.all = all;
                state.mine = mine;
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                warn!(error = %e, "survey lists refresh failed");
                let message = e.server_message().unwrap_or(FETCH_FALLBACK).to_string();
                state.notices.push(Notice::error(message));
                Err(DeskError::FetchFailed(e))
            }
        }
    }

    /// Detach the board from its view. Refreshes still in flight are
    /// discarded when they resolve.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.closed = true;
        state.generation += 1;
        state.loading = false;
        state.dialog = None;
    }

    /// Current render model: the filtered table, the summary metrics of the
    /// selected list, and the dialog if open.
    pub async fn view(&self) -> BoardView {
        let state = self.state.lock().await;
        let active = state.active_list();
        BoardView {
            surveys: filter_surveys(active, &state.filters)
                .into_iter()
                .cloned()
                .collect(),
            metrics: SurveyMetrics::from_surveys(active),
            filters: state.filters.clone(),
            active_card: state.active_card,
            dialog: state.dialog.as_ref().map(|dialog| DialogView {
                survey_id: dialog.survey.survey_id,
                title: dialog.survey.title.clone(),
                draft: dialog.draft.clone(),
                editable: dialog.editable,
                saving: dialog.saving,
            }),
            loading: state.loading,
        }
    }

    /// Drain the notices recorded since the last call.
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().await.notices)
    }

    // ---- filters ----

    /// Switch between all surveys and the user's own. Resets the status
    /// filter and the highlighted summary card.
    pub async fn set_scope(&self, scope: OwnerScope) {
        let mut state = self.state.lock().await;
        if state.filters.owner_scope != scope {
            state.filters.switch_scope(scope);
            state.active_card = StatusFilter::All;
        }
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.lock().await.filters.search_query = query.into();
    }

    pub async fn set_status_filter(&self, status: StatusFilter) {
        self.state.lock().await.filters.status = status;
    }

    pub async fn set_gender_filter(&self, gender: GenderFilter) {
        self.state.lock().await.filters.gender = gender;
    }

    pub async fn set_year_filter(&self, years: IdSelection) {
        self.state.lock().await.filters.academic_years = years;
    }

    pub async fn set_department_filter(&self, departments: IdSelection) {
        self.state.lock().await.filters.departments = departments;
    }

    /// Click on a summary card: filter the table by that card's status.
    pub async fn select_card(&self, card: StatusFilter) {
        let mut state = self.state.lock().await;
        state.filters.status = card;
        state.active_card = card;
    }

    // ---- quick edit ----

    /// Open the quick-edit dialog for a survey, returning which inputs the
    /// view should enable.
    pub async fn open_edit(&self, survey_id: i64) -> Result<EditableFields, DeskError> {
        let mut state = self.state.lock().await;
        let survey = state
            .find_survey(survey_id)
            .cloned()
            .ok_or(DeskError::SurveyNotFound(survey_id))?;
        let editable = EditableFields::for_survey(&survey);
        state.dialogs_opened += 1;
        let serial = state.dialogs_opened;
        state.dialog = Some(QuickEditDialog {
            serial,
            draft: EditDraft::from_survey(&survey),
            survey,
            editable,
            saving: false,
        });
        Ok(editable)
    }

    /// Change the working copy of the open dialog.
    pub async fn edit_draft(&self, change: impl FnOnce(&mut EditDraft)) -> Result<(), DeskError> {
        let mut state = self.state.lock().await;
        let dialog = state.dialog.as_mut().ok_or(DeskError::NoDialog)?;
        change(&mut dialog.draft);
        Ok(())
    }

    /// Close the dialog and drop its draft.
    pub async fn cancel_edit(&self) {
        self.state.lock().await.dialog = None;
    }

    /// Validate and submit the open dialog, then refetch both lists.
    ///
    /// Validation failures are reported as notices and never reach the
    /// server. An update failure leaves the lists and the dialog as they were
    /// so the user can retry.
    pub async fn save_edit(&self) -> Result<Survey, DeskError> {
        let (serial, survey_id, payload) = {
            let mut state = self.state.lock().await;
            let dialog = state.dialog.as_mut().ok_or(DeskError::NoDialog)?;
            if dialog.saving {
                return Err(DeskError::SaveInFlight);
            }
            if let Err(errors) = validate_edit_draft(&dialog.draft) {
                let notices: Vec<Notice> = errors
                    .iter()
                    .map(|(_, error)| Notice::error(error.to_string()))
                    .collect();
                state.notices.extend(notices);
                return Err(DeskError::Validation(errors));
            }
            dialog.saving = true;
            let payload = build_update_payload(&dialog.draft, dialog.editable);
            (dialog.serial, dialog.survey.survey_id, payload)
        };

        info!(survey_id, "saving quick edit");
        let result = self
            .service
            .update_survey_dates(&self.session, survey_id, &payload)
            .await;

        {
            let mut state = self.state.lock().await;
            let same_dialog = state
                .dialog
                .as_ref()
                .is_some_and(|dialog| dialog.serial == serial);
            match &result {
                Ok(_) => {
                    if same_dialog {
                        state.dialog = None;
                    }
                    state.notices.push(Notice::success("Survey updated"));
                }
                Err(e) => {
                    warn!(survey_id, error = %e, "quick edit failed");
                    if same_dialog && let Some(dialog) = state.dialog.as_mut() {
                        dialog.saving = false;
                    }
                    let message = e.server_message().unwrap_or(UPDATE_FALLBACK).to_string();
                    state.notices.push(Notice::error(message));
                }
            }
        }

        let updated = result.map_err(DeskError::UpdateFailed)?;
        // The update already landed; a failed refetch is reported as a notice.
        if let Err(e) = self.refresh().await {
            debug!(survey_id, error = %e, "refresh after save failed");
        }
        Ok(updated)
    }
}

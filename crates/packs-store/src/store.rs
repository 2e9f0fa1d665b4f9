//! [`ProfileStore`], the single owner of the profile record.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use packs_core::{
  api::{ClassificationUpdate, ProfileApi},
  draft::ProfileDraft,
  lifecycle::LoadState,
  profile::{CreatorProfile, ProfileRecord, ProfileSubject},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{Result, StoreError};

// ─── Store ───────────────────────────────────────────────────────────────────

/// State container for the signed-in account's profile.
///
/// Constructed explicitly and injected into whatever needs it (usually behind
/// an `Arc`). Views read snapshots or subscribe to transitions; they never
/// mutate the record, only call [`fetch`](Self::fetch),
/// [`update`](Self::update) and friends.
///
/// Each call issues exactly one request and never retries. Responses are
/// applied in completion order, with two exceptions: writes are refused
/// while a fetch is outstanding, and responses that resolve after
/// [`end_session`](Self::end_session) are dropped.
#[derive(Debug)]
pub struct ProfileStore<A> {
  api:               A,
  state:             watch::Sender<LoadState>,
  /// Bumped by `end_session`; a response whose request saw an older value is
  /// discarded.
  generation:        AtomicU64,
  fetches_in_flight: AtomicUsize,
}

impl<A: ProfileApi> ProfileStore<A> {
  pub fn new(api: A) -> Self {
    let (state, _) = watch::channel(LoadState::Uninitialized);
    Self {
      api,
      state,
      generation: AtomicU64::new(0),
      fetches_in_flight: AtomicUsize::new(0),
    }
  }

  /// The API this store proxies, for calls whose results the store does not
  /// own (submissions, user administration).
  pub fn api(&self) -> &A { &self.api }

  /// Receive every state transition from now on.
  pub fn subscribe(&self) -> watch::Receiver<LoadState> {
    self.state.subscribe()
  }

  pub fn snapshot(&self) -> LoadState { self.state.borrow().clone() }

  /// The best record currently held, including one kept across a failed
  /// refetch.
  pub fn record(&self) -> Option<ProfileRecord> {
    self.state.borrow().record().cloned()
  }

  pub fn is_fetching(&self) -> bool {
    self.fetches_in_flight.load(Ordering::Acquire) > 0
  }

  // ── Reads ──────────────────────────────────────────────────────────────

  /// Replace the record with the server's current snapshot.
  ///
  /// On failure the previous record stays available through
  /// [`LoadState::Error`] and [`StoreError::FetchFailed`] is returned. If the
  /// returned future is dropped before the response arrives, the state falls
  /// back to what it was before the fetch began.
  pub async fn fetch(&self) -> Result<ProfileRecord> {
    let generation = self.generation.load(Ordering::Acquire);
    let mut pending = PendingFetch::begin(self, generation);
    self.apply(generation, LoadState::begin_loading);
    debug!("fetching profile");

    let response = self.api.fetch_profile().await;
    pending.settle();

    match response {
      Ok(record) => {
        let loaded = LoadState::Loaded(record.clone());
        if !self.apply(generation, |_| loaded) {
          warn!("discarding profile fetched before the session ended");
          return Err(StoreError::SessionEnded);
        }
        info!(subject = %record.subject_type(), "profile loaded");
        Ok(record)
      }
      Err(e) => {
        let message = e.to_string();
        if !self.apply(generation, |state| state.fail(message)) {
          return Err(StoreError::SessionEnded);
        }
        warn!(error = %e, "profile fetch failed");
        Err(StoreError::FetchFailed(Box::new(e)))
      }
    }
  }

  // ── Writes ─────────────────────────────────────────────────────────────

  /// Submit `draft` as one multipart payload and replace the record with the
  /// server's confirmation.
  ///
  /// The draft is only borrowed: whatever happens, the caller still holds
  /// every edit. A response without the subject object keeps the loaded
  /// subject. Navigating away after success is the caller's job.
  pub async fn update(&self, draft: &ProfileDraft) -> Result<ProfileRecord> {
    self.ensure_no_fetch()?;
    let generation = self.generation.load(Ordering::Acquire);
    let parts = draft.to_form_parts();
    debug!(parts = parts.len(), subject = %draft.subject(), "saving profile");

    let saved = self.api.update_profile(parts).await.map_err(|e| {
      warn!(error = %e, "profile save failed");
      StoreError::UpdateFailed(Box::new(e))
    })?;
    if saved.subject.is_none() {
      debug!("save response has no subject; keeping the loaded one");
    }

    let mut confirmed = None;
    self.apply(generation, |state| {
      let record = saved.into_record(state.record());
      confirmed = Some(record.clone());
      LoadState::Loaded(record)
    });
    let Some(record) = confirmed else {
      warn!("discarding profile saved before the session ended");
      return Err(StoreError::SessionEnded);
    };
    info!("profile saved");
    Ok(record)
  }

  /// Replace the creator's genre and type sets.
  ///
  /// Only the replaced sets of the loaded creator change; the rest of the
  /// record is kept. Returns the merged creator, or the server's reply when
  /// no creator record is loaded.
  pub async fn update_classifications(
    &self,
    update: ClassificationUpdate,
  ) -> Result<CreatorProfile> {
    self.ensure_no_fetch()?;
    let generation = self.generation.load(Ordering::Acquire);
    debug!(
      genres = update.genres.len(),
      types = update.types.len(),
      "saving classifications"
    );

    let reply = self
      .api
      .update_classifications(update.clone())
      .await
      .map_err(|e| {
        warn!(error = %e, "classification save failed");
        StoreError::UpdateFailed(Box::new(e))
      })?;

    let mut merged = None;
    let applied = self.apply(generation, |state| match state {
      LoadState::Loaded(mut record) => {
        if let ProfileSubject::Creator(current) = &mut record.subject {
          update.merge_into(current, &reply);
          merged = Some(current.clone());
        }
        LoadState::Loaded(record)
      }
      other => {
        debug!("no loaded record to merge classifications into");
        other
      }
    });
    if !applied {
      return Err(StoreError::SessionEnded);
    }
    Ok(merged.unwrap_or(reply))
  }

  // ── Session ────────────────────────────────────────────────────────────

  /// Clear the record and orphan every request still in flight.
  pub fn end_session(&self) {
    self.state.send_modify(|state| {
      self.generation.fetch_add(1, Ordering::AcqRel);
      *state = LoadState::Uninitialized;
    });
    info!("session ended; profile cleared");
  }

  // ── Helpers ────────────────────────────────────────────────────────────

  /// Run `transition` on the current state unless the session has ended
  /// since `generation` was read. The check and the write happen under the
  /// channel's lock, so `end_session` cannot interleave.
  fn apply(
    &self,
    generation: u64,
    transition: impl FnOnce(LoadState) -> LoadState,
  ) -> bool {
    self.state.send_if_modified(|state| {
      if self.generation.load(Ordering::Acquire) != generation {
        return false;
      }
      *state = transition(std::mem::take(state));
      true
    })
  }

  fn ensure_no_fetch(&self) -> Result<()> {
    if self.is_fetching() {
      warn!("refusing to save while a profile fetch is outstanding");
      return Err(StoreError::FetchInFlight);
    }
    Ok(())
  }
}

/// Counts an outstanding fetch for as long as it lives. Dropped before
/// [`settle`](Self::settle), it reverts the `Loading` state its fetch set,
/// unless another fetch is still outstanding.
struct PendingFetch<'a, A: ProfileApi> {
  store:      &'a ProfileStore<A>,
  generation: u64,
  settled:    bool,
}

impl<'a, A: ProfileApi> PendingFetch<'a, A> {
  fn begin(store: &'a ProfileStore<A>, generation: u64) -> Self {
    store.fetches_in_flight.fetch_add(1, Ordering::AcqRel);
    Self {
      store,
      generation,
      settled: false,
    }
  }

  /// The response arrived; the caller applies it.
  fn settle(&mut self) { self.settled = true; }
}

impl<A: ProfileApi> Drop for PendingFetch<'_, A> {
  fn drop(&mut self) {
    let in_flight = &self.store.fetches_in_flight;
    in_flight.fetch_sub(1, Ordering::AcqRel);
    if self.settled {
      return;
    }
    warn!("profile fetch abandoned before the response arrived");
    self.store.apply(self.generation, |state| {
      if in_flight.load(Ordering::Acquire) == 0 {
        state.abandon()
      } else {
        state
      }
    });
  }
}

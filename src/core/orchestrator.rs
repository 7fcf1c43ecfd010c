use crate::core::detector::ChangeDetector;
use crate::core::filter::filter_sessions;
use crate::core::render::render_report;
use crate::domain::model::{
    Dose, Location, Notification, Preferences, QueryScope, ResolvedLocation, Snapshot, StreamId,
};
use crate::domain::ports::{LocationResolver, Notifier, SnapshotSource};
use crate::utils::error::{Result, SlotError};
use chrono::{Duration, Local, NaiveDate};
use std::future::Future;

/// 單一串流在一輪檢查中的結果
#[derive(Debug)]
pub struct StreamOutcome {
    pub stream: StreamId,
    pub label: String,
    pub fired: bool,
    pub error: Option<SlotError>,
}

#[derive(Debug, Default)]
pub struct CycleReport {
    pub outcomes: Vec<StreamOutcome>,
}

impl CycleReport {
    pub fn outcome(&self, stream: StreamId) -> Option<&StreamOutcome> {
        self.outcomes.iter().find(|o| o.stream == stream)
    }

    pub fn fired(&self, stream: StreamId) -> bool {
        self.outcome(stream).map(|o| o.fired).unwrap_or(false)
    }

    pub fn notifications_sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.fired && o.error.is_none())
            .count()
    }

    pub fn errors(&self) -> impl Iterator<Item = (StreamId, &SlotError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| (o.stream, e)))
    }

    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }
}

struct StreamPlan {
    stream: StreamId,
    scope: QueryScope,
    label: String,
}

/// 已解析的地點，連同解析時用的名稱
struct CachedLocation {
    state: String,
    district: String,
    ids: ResolvedLocation,
}

impl CachedLocation {
    fn matches(&self, location: &Location) -> bool {
        self.state.eq_ignore_ascii_case(&location.state)
            && self.district.eq_ignore_ascii_case(&location.district)
    }
}

/// 驅動「今天 / 近處」與「七天後 / 較大範圍」兩條查詢串流。
///
/// 地點 ID 在成功解析後依州名與行政區名快取在實例上，名稱改變時重新解析；
/// 每條串流的變化記憶也只屬於這個實例，因此 `run_cycle` 需要 `&mut self`。
pub struct Orchestrator<S: SnapshotSource, R: LocationResolver, N: Notifier> {
    source: S,
    resolver: R,
    notifier: N,
    detector: ChangeDetector,
    resolved: Option<CachedLocation>,
}

impl<S: SnapshotSource, R: LocationResolver, N: Notifier> Orchestrator<S, R, N> {
    pub fn new(source: S, resolver: R, notifier: N) -> Self {
        Self {
            source,
            resolver,
            notifier,
            detector: ChangeDetector::new(),
            resolved: None,
        }
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn resolved_location(&self) -> Option<ResolvedLocation> {
        self.resolved.as_ref().map(|cached| cached.ids)
    }

    /// 依固定間隔反覆執行 `run_cycle`，直到 `shutdown` 完成。
    ///
    /// 進行中的一輪一定跑完，期間收到的關閉訊號在下一次等待時生效。
    /// 暫時性錯誤記錄後繼續，其餘錯誤直接回傳。
    pub async fn watch<F>(
        &mut self,
        period: std::time::Duration,
        dose: Dose,
        prefs: &Preferences,
        location: &Location,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(period);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping watch loop");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            match self.run_cycle(dose, prefs, location).await {
                Ok(report) => {
                    for (stream, e) in report.errors() {
                        tracing::warn!("{} stream finished with error: {}", stream, e);
                    }
                    tracing::debug!(
                        "Cycle finished, {} notification(s) sent",
                        report.notifications_sent()
                    );
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!("{}, rechecking after {} seconds", e, period.as_secs());
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn run_cycle(
        &mut self,
        dose: Dose,
        prefs: &Preferences,
        location: &Location,
    ) -> Result<CycleReport> {
        let today = Local::now().date_naive();
        self.run_cycle_on(today, dose, prefs, location).await
    }

    pub async fn run_cycle_on(
        &mut self,
        today: NaiveDate,
        dose: Dose,
        prefs: &Preferences,
        location: &Location,
    ) -> Result<CycleReport> {
        let resolved = self.resolve(location).await?;
        let [today_plan, week_plan] = plan_streams(location, resolved);

        let (today_snapshot, week_snapshot) = tokio::join!(
            self.source.fetch(&today_plan.scope, date_for(today, today_plan.stream)),
            self.source.fetch(&week_plan.scope, date_for(today, week_plan.stream)),
        );

        let (today_snapshot, week_snapshot) = match (today_snapshot, week_snapshot) {
            (Err(today), Err(week_ahead)) => {
                return Err(SlotError::AllStreamsFailed {
                    today: Box::new(today),
                    week_ahead: Box::new(week_ahead),
                });
            }
            pair => pair,
        };

        let mut report = CycleReport::default();
        for (plan, fetched) in [(today_plan, today_snapshot), (week_plan, week_snapshot)] {
            let outcome = self.evaluate_stream(plan, fetched, dose, prefs).await;
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    async fn resolve(&mut self, location: &Location) -> Result<ResolvedLocation> {
        if let Some(cached) = self.resolved.as_ref().filter(|c| c.matches(location)) {
            return Ok(cached.ids);
        }

        let state_id = self
            .resolver
            .resolve_state(&location.state)
            .await
            .map_err(|e| SlotError::LocationResolution(Box::new(e)))?;
        let district_id = self
            .resolver
            .resolve_district(state_id, &location.district)
            .await
            .map_err(|e| SlotError::LocationResolution(Box::new(e)))?;

        tracing::info!(
            "Resolved location {} / {} to state_id={} district_id={}",
            location.state,
            location.district,
            state_id,
            district_id
        );

        let ids = ResolvedLocation {
            state_id,
            district_id,
        };
        self.resolved = Some(CachedLocation {
            state: location.state.clone(),
            district: location.district.clone(),
            ids,
        });
        Ok(ids)
    }

    async fn evaluate_stream(
        &mut self,
        plan: StreamPlan,
        fetched: Result<Snapshot>,
        dose: Dose,
        prefs: &Preferences,
    ) -> StreamOutcome {
        let StreamPlan { stream, label, .. } = plan;

        // 取得或解析失敗時不更新這條串流的記憶
        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Skipping {} stream for {}: {}", stream, label, e);
                return StreamOutcome {
                    stream,
                    label,
                    fired: false,
                    error: Some(e),
                };
            }
        };

        if snapshot.is_no_data() {
            tracing::info!("Received no data for {} stream ({}), treating as no slots", stream, label);
        }

        let matches = filter_sessions(&snapshot, prefs, dose);
        let report = render_report(&matches, dose);
        let fired = self.detector.evaluate(stream, &report);

        if report.is_empty() {
            tracing::info!("No slots available for {} stream ({})", stream, label);
        } else if !fired {
            tracing::info!(
                "Found available slots for {} stream ({}) same as before, skip notifying",
                stream,
                label
            );
        }

        let mut error = None;
        if fired {
            tracing::info!(
                "Found {} available sessions for {} stream ({}), sending notification",
                matches.len(),
                stream,
                label
            );
            let notification = Notification {
                age: prefs.age,
                dose: Some(dose),
                location: label.clone(),
                report,
            };
            if let Err(e) = self.notifier.send(&notification).await {
                tracing::error!("Failed to notify for {} stream ({}): {}", stream, label, e);
                error = Some(e);
            }
        }

        StreamOutcome {
            stream,
            label,
            fired,
            error,
        }
    }
}

fn date_for(today: NaiveDate, stream: StreamId) -> NaiveDate {
    today + Duration::days(stream.days_ahead())
}

/// 有郵遞區號時今天查郵遞區號，否則兩條串流都查行政區
fn plan_streams(location: &Location, resolved: ResolvedLocation) -> [StreamPlan; 2] {
    let today = match &location.pincode {
        Some(pincode) => StreamPlan {
            stream: StreamId::Today,
            scope: QueryScope::Pincode(pincode.clone()),
            label: pincode.clone(),
        },
        None => StreamPlan {
            stream: StreamId::Today,
            scope: QueryScope::District(resolved.district_id),
            label: location.district.clone(),
        },
    };
    let week_ahead = StreamPlan {
        stream: StreamId::WeekAhead,
        scope: QueryScope::District(resolved.district_id),
        label: location.district.clone(),
    };
    [today, week_ahead]
}

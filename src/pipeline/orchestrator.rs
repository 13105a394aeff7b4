//! # 流水线编排器
//!
//! ## 设计思路
//!
//! `Orchestrator` 只负责流程编排，不关心具体服务实现。处理链路固定为：
//! 1. 检查密钥（缺失时直接拒绝，不改动状态、不调用任何服务）
//! 2. 开启新一轮运行并重置状态
//! 3. 读取图片为 Data URL
//! 4. 视觉描述
//! 5. 文案生成
//!
//! 任一阶段失败都在这里被捕获并转换为 `error` 状态，错误不会继续向展示层抛出。
//!
//! ## 实现思路
//!
//! - 状态保存在 `tokio::sync::watch` 通道中，展示层通过 `subscribe()` 获取最新快照。
//! - 每次选择图片都会递增运行号；阶段结果只在运行号仍为最新时才写入，
//!   过期结果直接丢弃（以忽略代替取消）。
//! - 运行号校验与状态替换在同一把锁（watch 的内部锁）内完成。
//! - 记录 `load/vision/copy/total` 阶段耗时，便于排查慢请求。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::watch;

use super::state::{AnalysisState, PipelineEvent, transition};
use crate::clients::{CopyService, VisionService};
use crate::error::AppError;
use crate::image_source::{ImageSource, load_image};
use crate::key_store::CredentialStore;
use crate::output::split_variations;

/// 图片 → 描述 → 文案 的编排器。
pub struct Orchestrator<V, C, K> {
    vision: V,
    copy: C,
    credentials: K,
    max_image_bytes: u64,
    state_tx: watch::Sender<AnalysisState>,
    current_run: AtomicU64,
}

impl<V, C, K> Orchestrator<V, C, K>
where
    V: VisionService,
    C: CopyService,
    K: CredentialStore,
{
    pub fn new(vision: V, copy: C, credentials: K, max_image_bytes: u64) -> Self {
        let (state_tx, _) = watch::channel(AnalysisState::default());
        Self {
            vision,
            copy,
            credentials,
            max_image_bytes,
            state_tx,
            current_run: AtomicU64::new(0),
        }
    }

    /// 当前状态快照。
    pub fn snapshot(&self) -> AnalysisState {
        self.state_tx.borrow().clone()
    }

    /// 订阅状态变化。
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state_tx.subscribe()
    }

    pub fn credentials(&self) -> &K {
        &self.credentials
    }

    /// 当前结果拆分后的文案列表。
    pub fn variations(&self) -> Vec<String> {
        split_variations(self.state_tx.borrow().final_copy.as_deref())
    }

    /// 处理主入口：用户选择了一张图片。
    ///
    /// - 未配置密钥：返回 `Err(AppError::MissingCredential)`，状态不变。
    /// - 其他情况：返回本轮结束时的状态快照；阶段失败体现在快照的 `error` 中。
    ///   若本轮被更新的选择取代，返回的是届时的最新快照。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use konten_kilat::image_source::ImageSource;
    ///
    /// let state = orchestrator
    ///     .on_image_selected(ImageSource::FilePath("produk.jpg".into()))
    ///     .await?;
    /// println!("{:?}", state.status);
    /// ```
    pub async fn on_image_selected(&self, source: ImageSource) -> Result<AnalysisState, AppError> {
        let credential = match self.credentials.get()? {
            Some(credential) => credential,
            None => {
                log::warn!("🔑 未配置 Kolosal API Key，拒绝开始处理");
                return Err(AppError::MissingCredential);
            }
        };

        let run_id = self.begin_run();
        log::info!("🚀 开始第 {} 轮处理", run_id);

        if let Err(err) = self.execute(run_id, source, &credential).await {
            if self.apply(run_id, PipelineEvent::Failed { message: Some(err.to_string()) }) {
                log::error!("❌ 第 {} 轮处理失败 [{}]: {}", run_id, err.code(), err);
            } else {
                self.log_stale(run_id, err.stage());
            }
        }

        Ok(self.snapshot())
    }

    async fn execute(&self, run_id: u64, source: ImageSource, credential: &str) -> Result<(), AppError> {
        let total_start = Instant::now();

        let load_start = Instant::now();
        let payload = load_image(source, self.max_image_bytes).await?;
        let load_elapsed = load_start.elapsed();

        if !self.apply(run_id, PipelineEvent::ImageLoaded { data_url: payload.data_url.clone() }) {
            self.log_stale(run_id, "load");
            return Ok(());
        }

        let vision_start = Instant::now();
        let description = self
            .vision
            .describe(&payload.data_url, &payload.mime_type)
            .await?;
        let vision_elapsed = vision_start.elapsed();

        if !self.apply(run_id, PipelineEvent::DescriptionReady { description: description.clone() }) {
            self.log_stale(run_id, "vision");
            return Ok(());
        }

        let copy_start = Instant::now();
        let raw = self.copy.generate(&description, credential).await?;
        let copy_elapsed = copy_start.elapsed();

        if !self.apply(run_id, PipelineEvent::CopyReady { raw }) {
            self.log_stale(run_id, "copy");
            return Ok(());
        }

        log::info!(
            "✅ 第 {} 轮处理完成 - load={}ms vision={}ms copy={}ms total={}ms",
            run_id,
            load_elapsed.as_millis(),
            vision_elapsed.as_millis(),
            copy_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );
        Ok(())
    }

    /// 递增运行号并重置状态，两者在同一把锁内完成。
    fn begin_run(&self) -> u64 {
        let mut run_id = 0;
        self.state_tx.send_modify(|state| {
            run_id = self.current_run.fetch_add(1, Ordering::SeqCst) + 1;
            *state = transition(state, PipelineEvent::ImageSelected);
        });
        run_id
    }

    /// 运行号仍为最新时应用事件；返回该轮是否仍然有效。
    fn apply(&self, run_id: u64, event: PipelineEvent) -> bool {
        let mut still_current = false;
        self.state_tx.send_if_modified(|state| {
            if !self.is_current(run_id) {
                return false;
            }
            still_current = true;

            let next = transition(state, event);
            if next == *state {
                return false;
            }
            if next.status != state.status {
                log::debug!("🔄 第 {} 轮状态 {} → {}", run_id, state.status.as_str(), next.status.as_str());
            }
            *state = next;
            true
        });
        still_current
    }

    fn is_current(&self, run_id: u64) -> bool {
        self.current_run.load(Ordering::SeqCst) == run_id
    }

    fn log_stale(&self, run_id: u64, stage: &str) {
        log::warn!(
            "⏭️ 第 {} 轮已被第 {} 轮取代，丢弃 {} 阶段结果",
            run_id,
            self.current_run.load(Ordering::SeqCst),
            stage
        );
    }
}

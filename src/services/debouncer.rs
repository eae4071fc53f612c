// 搜索防抖
//
// 在静默窗口内合并连续输入，只把最后一次输入发送给搜索接口（尾沿防抖）。

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::ItemNormalizer;
use crate::external::{CatalogClient, CatalogError};
use crate::models::MediaItem;

/// 默认静默窗口
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// 可取消的计时器
///
/// 同一时刻最多只有一个计时任务存活。重新调度会先取消旧任务；
/// 计时器被丢弃时同样取消任务，避免视图销毁后旧回调继续修改状态。
#[derive(Debug, Default)]
pub struct DebounceTimer {
    handle: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在 `delay` 之后执行 `task`，取消之前的任务。必须在 tokio 运行时中调用。
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// 取消尚未完成的任务，返回是否确实取消了什么
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().map_or(false, |handle| !handle.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 搜索防抖器
///
/// 搜索结果通过 watch 通道发布，每次成功的搜索整体替换旧结果（不合并、不分页）。
///
/// 每次提交、取消、清空或立即搜索都会推进代数；请求返回时代数已变化则丢弃结果。
pub struct SearchDebouncer {
    client: Arc<dyn CatalogClient>,
    window: Duration,
    timer: Mutex<DebounceTimer>,
    results: Arc<watch::Sender<Vec<MediaItem>>>,
    generation: Arc<AtomicU64>,
}

impl SearchDebouncer {
    pub fn new(client: Arc<dyn CatalogClient>, window: Duration) -> Self {
        let (results, _) = watch::channel(Vec::new());
        Self {
            client,
            window,
            timer: Mutex::new(DebounceTimer::new()),
            results: Arc::new(results),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn timer(&self) -> MutexGuard<'_, DebounceTimer> {
        self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 使所有进行中的请求失效，返回新的代数
    fn advance(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn publisher(&self, generation: u64) -> Publisher {
        Publisher {
            results: self.results.clone(),
            current: self.generation.clone(),
            generation,
        }
    }

    /// 提交输入
    ///
    /// 空白输入立即清空结果且不发请求；否则在最近一次提交的 `window` 之后搜索。
    pub fn submit(&self, text: &str) {
        let mut timer = self.timer();
        let generation = self.advance();
        if text.trim().is_empty() {
            timer.cancel();
            self.results.send_replace(Vec::new());
            tracing::debug!("Empty search query, results cleared");
            return;
        }

        let client = self.client.clone();
        let publisher = self.publisher(generation);
        let text = text.to_string();
        timer.schedule(self.window, async move {
            // 失败已在 run_search 中记录，旧结果保持不变
            let _ = run_search(client.as_ref(), &publisher, &text).await;
        });
    }

    /// 丢弃尚未触发的计时器，进行中的请求结果也不再发布
    pub fn cancel(&self) {
        self.advance();
        if self.timer().cancel() {
            tracing::debug!("Pending search cancelled");
        }
    }

    /// 立即搜索，跳过防抖窗口并取消尚未触发的计时器
    pub async fn search(&self, text: &str) -> Result<Vec<MediaItem>, CatalogError> {
        self.timer().cancel();
        let generation = self.advance();
        if text.trim().is_empty() {
            self.results.send_replace(Vec::new());
            return Ok(Vec::new());
        }
        run_search(self.client.as_ref(), &self.publisher(generation), text).await
    }

    /// 取消计时器并清空结果
    pub fn clear(&self) {
        self.timer().cancel();
        self.advance();
        self.results.send_replace(Vec::new());
    }

    pub fn results(&self) -> Vec<MediaItem> {
        self.results.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<MediaItem>> {
        self.results.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.timer().is_armed()
    }
}

/// 绑定到某一代数的结果发布者
struct Publisher {
    results: Arc<watch::Sender<Vec<MediaItem>>>,
    current: Arc<AtomicU64>,
    generation: u64,
}

impl Publisher {
    /// 代数未变化时替换结果，返回是否发布
    fn publish(&self, items: Vec<MediaItem>) -> bool {
        self.results.send_if_modified(|current| {
            if self.current.load(Ordering::SeqCst) != self.generation {
                return false;
            }
            *current = items;
            true
        })
    }
}

async fn run_search(
    client: &dyn CatalogClient,
    publisher: &Publisher,
    text: &str,
) -> Result<Vec<MediaItem>, CatalogError> {
    match client.search(text).await {
        Ok(page) => {
            let items = ItemNormalizer::normalize_batch(&page.results, None);
            if publisher.publish(items.clone()) {
                tracing::info!("Search {:?} returned {} results", text, items.len());
            } else {
                tracing::debug!("Discarding stale results for {:?}", text);
            }
            Ok(items)
        }
        Err(e) => {
            tracing::warn!("Search {:?} failed: {}", text, e);
            Err(e)
        }
    }
}

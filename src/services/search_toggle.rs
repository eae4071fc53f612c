// 搜索框显示控制
//
// 状态只有 Hidden / Visible 两种。切换由点击计数的奇偶决定（而不是读取当前状态）：
// 第奇数次点击显示搜索框，第偶数次点击隐藏搜索框并提交当前输入。

use std::sync::{Arc, Mutex, MutexGuard};

use super::SearchDebouncer;
use crate::models::{SearchSnapshot, Visibility};

/// 一次切换对应的状态转移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Show,
    HideAndCommit,
}

impl Transition {
    /// `invocation` 为从 1 开始的点击序号
    pub fn for_invocation(invocation: u64) -> Self {
        if invocation % 2 == 1 {
            Transition::Show
        } else {
            Transition::HideAndCommit
        }
    }

    pub fn target(&self) -> Visibility {
        match self {
            Transition::Show => Visibility::Visible,
            Transition::HideAndCommit => Visibility::Hidden,
        }
    }
}

#[derive(Debug)]
struct ToggleState {
    query: String,
    visibility: Visibility,
    click_count: u64,
}

/// 搜索框显示控制器
pub struct SearchVisibilityController {
    debouncer: Arc<SearchDebouncer>,
    state: Mutex<ToggleState>,
}

impl SearchVisibilityController {
    pub fn new(debouncer: Arc<SearchDebouncer>) -> Self {
        Self {
            debouncer,
            state: Mutex::new(ToggleState {
                query: String::new(),
                visibility: Visibility::Hidden,
                click_count: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ToggleState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn debouncer(&self) -> &Arc<SearchDebouncer> {
        &self.debouncer
    }

    /// 点击搜索按钮
    pub fn toggle(&self) -> Visibility {
        let (transition, query) = {
            let mut state = self.lock();
            state.click_count += 1;
            let transition = Transition::for_invocation(state.click_count);
            state.visibility = transition.target();
            (transition, state.query.clone())
        };

        tracing::debug!("Search toggle: {:?}", transition);
        if transition == Transition::HideAndCommit {
            self.debouncer.submit(&query);
        }
        transition.target()
    }

    /// 输入框内容变化，转交防抖器
    pub fn input(&self, text: &str) {
        self.lock().query = text.to_string();
        self.debouncer.submit(text);
    }

    /// 显式提交（如回车），不改变显示状态
    pub fn commit(&self) {
        let query = self.lock().query.clone();
        self.debouncer.submit(&query);
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    /// 页面导航时清空搜索结果
    pub fn reset(&self) {
        self.debouncer.clear();
    }

    pub fn visibility(&self) -> Visibility {
        self.lock().visibility
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        let state = self.lock();
        SearchSnapshot {
            query: state.query.clone(),
            visible: state.visibility.is_visible(),
            click_count: state.click_count,
            results: self.debouncer.results(),
            pending: self.debouncer.is_pending(),
        }
    }
}

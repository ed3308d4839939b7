//! 单次结果交付
//!
//! 每个回合持有一个一次性交付槽：各终态分支自行尝试交付，只有第一次成功，
//! 之后的交付都是记日志的空操作。「take 即占用」保证超时与正常完成
//! 竞争时也只有一个结果外流。

use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::core::error::TurnResult;

/// 一次性交付槽（发送端）
pub struct TurnDelivery {
    slot: Mutex<Option<oneshot::Sender<TurnResult>>>,
}

impl TurnDelivery {
    /// 新建交付槽与配对的接收端
    pub fn channel() -> (Self, oneshot::Receiver<TurnResult>) {
        let (tx, rx) = oneshot::channel();
        (Self { slot: Mutex::new(Some(tx)) }, rx)
    }

    /// 尝试交付结果；槽已被占用时丢弃并返回 false
    pub fn deliver(&self, result: TurnResult) -> bool {
        let sender = self.slot.lock().unwrap().take();
        match sender {
            Some(tx) => {
                if tx.send(result).is_err() {
                    tracing::debug!("turn result receiver dropped");
                }
                true
            }
            None => {
                tracing::warn!(dropped = ?result, "duplicate turn result dropped");
                false
            }
        }
    }

    /// 是否已交付过
    pub fn is_delivered(&self) -> bool {
        self.slot.lock().unwrap().is_none()
    }
}

//! Generation Context - 进度与阶段状态机
//!
//! 状态: idle → outline → expanding → complete
//! 取消或失败时回到 idle

use serde::{Deserialize, Serialize};

use super::GenerationStateError;

/// 大纲请求发出时的进度
pub const OUTLINE_PERCENT: u8 = 10;
/// 大纲返回后的进度
pub const EXPANDING_PERCENT: u8 = 30;
/// 章节阶段占用的进度区间宽度（30 → 95）
pub const EXPANDING_BAND: f64 = 65.0;
/// 完成时的进度
pub const COMPLETE_PERCENT: u8 = 100;

pub const LABEL_OUTLINE: &str = "Generating outline...";
pub const LABEL_COMPLETE: &str = "Ebook generated successfully!";
pub const LABEL_CANCELLED: &str = "Generation cancelled";
pub const LABEL_ERROR: &str = "Error generating ebook. Please try again.";

/// 生成阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    #[default]
    Idle,
    Outline,
    Expanding,
    Complete,
}

impl GenerationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStage::Idle => "idle",
            GenerationStage::Outline => "outline",
            GenerationStage::Expanding => "expanding",
            GenerationStage::Complete => "complete",
        }
    }
}

/// 生成进度快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerationProgress {
    pub stage: GenerationStage,
    pub percent: u8,
    pub current_step_label: String,
}

/// 第 `index` 节（从 0 开始）完成后的进度: `30 + (index+1)/total * 65`
pub fn section_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return EXPANDING_PERCENT;
    }
    let done = (index + 1).min(total) as f64;
    let value = f64::from(EXPANDING_PERCENT) + done / total as f64 * EXPANDING_BAND;
    value.round() as u8
}

/// 章节进行中的提示文案
pub fn section_label(index: usize, total: usize, title: &str) -> String {
    format!("Generating section {} of {}: {}", index + 1, total, title)
}

/// 单次生成运行的状态
///
/// 不变量:
/// - 进度在一次运行内单调不减
/// - 仅在 complete 阶段进度为 100
/// - 新运行从进度 0、空大纲开始
#[derive(Debug, Clone, Default)]
pub struct GenerationSession {
    progress: GenerationProgress,
    outline: Vec<String>,
    sections_done: usize,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> &GenerationProgress {
        &self.progress
    }

    pub fn outline(&self) -> &[String] {
        &self.outline
    }

    pub fn sections_done(&self) -> usize {
        self.sections_done
    }

    pub fn stage(&self) -> GenerationStage {
        self.progress.stage
    }

    /// idle → outline
    pub fn begin(&mut self) -> Result<(), GenerationStateError> {
        self.expect_stage(GenerationStage::Idle, "begin")?;
        self.outline.clear();
        self.sections_done = 0;
        self.progress = GenerationProgress::default();
        self.set(GenerationStage::Outline, OUTLINE_PERCENT, LABEL_OUTLINE.to_string());
        Ok(())
    }

    /// outline → expanding
    pub fn outline_received(&mut self, outline: Vec<String>) -> Result<(), GenerationStateError> {
        self.expect_stage(GenerationStage::Outline, "outline_received")?;
        if outline.is_empty() {
            return Err(GenerationStateError::EmptyOutline);
        }
        let label = section_label(0, outline.len(), &outline[0]);
        self.outline = outline;
        self.set(GenerationStage::Expanding, EXPANDING_PERCENT, label);
        Ok(())
    }

    /// 第 `index` 节开始（仅更新文案）
    pub fn section_started(&mut self, index: usize) -> Result<(), GenerationStateError> {
        self.expect_stage(GenerationStage::Expanding, "section_started")?;
        self.expect_next_section(index)?;
        self.progress.current_step_label =
            section_label(index, self.outline.len(), &self.outline[index]);
        Ok(())
    }

    /// expanding → expanding，第 `index` 节完成
    pub fn section_completed(&mut self, index: usize) -> Result<(), GenerationStateError> {
        self.expect_stage(GenerationStage::Expanding, "section_completed")?;
        self.expect_next_section(index)?;
        self.sections_done += 1;
        let percent = section_percent(index, self.outline.len());
        let label = self.progress.current_step_label.clone();
        self.set(GenerationStage::Expanding, percent, label);
        Ok(())
    }

    /// expanding → complete，要求所有章节已完成
    pub fn complete(&mut self) -> Result<(), GenerationStateError> {
        self.expect_stage(GenerationStage::Expanding, "complete")?;
        if self.sections_done != self.outline.len() {
            return Err(GenerationStateError::SectionsPending {
                done: self.sections_done,
                total: self.outline.len(),
            });
        }
        self.set(GenerationStage::Complete, COMPLETE_PERCENT, LABEL_COMPLETE.to_string());
        Ok(())
    }

    /// 任意阶段 → idle（取消）
    pub fn cancel(&mut self) {
        self.progress.stage = GenerationStage::Idle;
        self.progress.current_step_label = LABEL_CANCELLED.to_string();
    }

    /// 任意阶段 → idle（失败）
    pub fn fail(&mut self) {
        self.progress.stage = GenerationStage::Idle;
        self.progress.current_step_label = LABEL_ERROR.to_string();
    }

    fn set(&mut self, stage: GenerationStage, percent: u8, label: String) {
        self.progress = GenerationProgress {
            stage,
            percent: percent.max(self.progress.percent),
            current_step_label: label,
        };
    }

    fn expect_stage(
        &self,
        expected: GenerationStage,
        action: &'static str,
    ) -> Result<(), GenerationStateError> {
        if self.progress.stage != expected {
            return Err(GenerationStateError::InvalidTransition {
                action,
                stage: self.progress.stage,
            });
        }
        Ok(())
    }

    fn expect_next_section(&self, index: usize) -> Result<(), GenerationStateError> {
        if index != self.sections_done || index >= self.outline.len() {
            return Err(GenerationStateError::OutOfOrder {
                expected: self.sections_done,
                got: index,
            });
        }
        Ok(())
    }
}

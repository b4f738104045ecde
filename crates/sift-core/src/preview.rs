use crate::item::ContentItem;
use crate::queue::ContentQueue;

const SCALE_STEP: f64 = 0.05;
const OFFSET_STEP_PX: f64 = 12.0;
const OPACITY_STEP: f64 = 0.25;

/// One card of the preview window, with the depth styling the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewCard<'a> {
    pub item: &'a ContentItem,
    /// 0 for the interactive card, increasing towards the back of the stack.
    pub depth: usize,
    pub scale: f64,
    pub offset_y: f64,
    pub opacity: f64,
}

impl PreviewCard<'_> {
    /// Only the front card receives drag events.
    pub fn is_interactive(&self) -> bool {
        self.depth == 0
    }
}

/// What the stack area should display.
#[derive(Debug, Clone, PartialEq)]
pub enum StackView<'a> {
    Cards(Vec<PreviewCard<'a>>),
    /// "All caught up": the only available action is reset.
    Exhausted,
}

/// The items from the cursor onwards, at most `depth` of them, front to back.
pub fn preview(queue: &ContentQueue, depth: usize) -> Vec<PreviewCard<'_>> {
    queue
        .window(depth)
        .iter()
        .enumerate()
        .map(|(depth, item)| {
            let step = depth as f64;
            PreviewCard {
                item,
                depth,
                scale: 1.0 - SCALE_STEP * step,
                offset_y: OFFSET_STEP_PX * step,
                opacity: (1.0 - OPACITY_STEP * step).max(0.0),
            }
        })
        .collect()
}

pub fn stack_view(queue: &ContentQueue, depth: usize) -> StackView<'_> {
    if queue.is_exhausted() {
        StackView::Exhausted
    } else {
        StackView::Cards(preview(queue, depth))
    }
}

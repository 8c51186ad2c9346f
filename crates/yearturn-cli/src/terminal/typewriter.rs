//! Per-character reveal of each message in turn. Stops on the last message.

use std::cell::RefCell;
use std::rc::Rc;

use yearturn_core::TextCycler;

const CHARS_PER_FRAME: usize = 6;
/// Frames a fully typed message stays up before the next one starts.
const HOLD_FRAMES: u32 = 2;
const CURSOR: char = '_';

#[derive(Debug, Default)]
struct Reel {
    messages: Vec<String>,
    index: usize,
    revealed: usize,
    held: u32,
}

impl Reel {
    fn current_len(&self) -> usize {
        self.messages
            .get(self.index)
            .map(|m| m.chars().count())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Typewriter {
    reel: Rc<RefCell<Reel>>,
}

impl Typewriter {
    /// Move the animation forward by one frame.
    pub fn advance(&self) {
        let mut reel = self.reel.borrow_mut();
        if reel.messages.is_empty() {
            return;
        }
        let len = reel.current_len();
        if reel.revealed < len {
            reel.revealed = (reel.revealed + CHARS_PER_FRAME).min(len);
        } else if reel.index + 1 < reel.messages.len() {
            if reel.held < HOLD_FRAMES {
                reel.held += 1;
            } else {
                reel.index += 1;
                reel.revealed = 0;
                reel.held = 0;
            }
        }
    }

    pub fn line(&self) -> String {
        let reel = self.reel.borrow();
        let mut line: String = reel
            .messages
            .get(reel.index)
            .map(|m| m.chars().take(reel.revealed).collect())
            .unwrap_or_default();
        line.push(CURSOR);
        line
    }

    /// True once the last message is fully typed.
    pub fn finished(&self) -> bool {
        let reel = self.reel.borrow();
        !reel.messages.is_empty()
            && reel.index + 1 == reel.messages.len()
            && reel.revealed >= reel.current_len()
    }
}

impl TextCycler for Typewriter {
    fn start(&mut self, messages: &[String]) {
        *self.reel.borrow_mut() = Reel {
            messages: messages.to_vec(),
            ..Reel::default()
        };
    }
}

/// Open/minimized state of the chat panel, owned by whoever hosts the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatPanel {
    pub open: bool,
    pub minimized: bool,
}

impl ChatPanel {
    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.minimized = false;
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.minimized = false;
    }

    pub fn minimize(&mut self) {
        self.minimized = !self.minimized;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.minimized = false;
    }
}

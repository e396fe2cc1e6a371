use core::convert::Infallible;

use tm16xx::Transport;

/// Records every start..stop transaction as the list of bytes sent in it.
#[derive(Default)]
pub struct RecordingBus {
    pub frames: Vec<Vec<u8>>,
    pub replies: Vec<u8>,
    open: Option<Vec<u8>>,
}

impl RecordingBus {
    pub fn with_replies(replies: &[u8]) -> Self {
        Self {
            replies: replies.to_vec(),
            ..Default::default()
        }
    }

    /// Frames written with fixed addressing, as `(address, data)` pairs.
    pub fn data_writes(&self) -> Vec<(u8, u8)> {
        self.frames
            .windows(2)
            .filter(|pair| pair[0] == [0x44])
            .map(|pair| (pair[1][0] & 0x3F, pair[1][1]))
            .collect()
    }
}

impl Transport for RecordingBus {
    type Error = Infallible;

    fn start(&mut self) -> Result<(), Infallible> {
        assert!(self.open.is_none(), "nested start");
        self.open = Some(Vec::new());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Infallible> {
        let frame = self.open.take().expect("stop without start");
        self.frames.push(frame);
        Ok(())
    }

    fn send(&mut self, data: u8) -> Result<(), Infallible> {
        self.open.as_mut().expect("send outside a transaction").push(data);
        Ok(())
    }

    fn receive(&mut self) -> Result<u8, Infallible> {
        assert!(self.open.is_some(), "receive outside a transaction");
        Ok(if self.replies.is_empty() {
            0
        } else {
            self.replies.remove(0)
        })
    }

    fn bit_delay(&mut self) {}
}

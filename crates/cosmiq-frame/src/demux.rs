use crate::channel::Channel;
use crate::codec::{parse_line, MIN_LINE_LEN};
use crate::command::{ChannelKind, BODY, HEADER};

/// Routing table and line filter for the demultiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemuxConfig {
    /// Command code routed to the header channel. Default: 0x42.
    pub header_command: u8,
    /// Command code routed to the body channel. Default: 0x44.
    pub body_command: u8,
    /// Minimum trimmed line length for a line to count as a frame. Default: 10.
    pub min_line_len: usize,
}

impl DemuxConfig {
    /// Channel a command code is routed to, if any.
    pub fn route(&self, command: u8) -> Option<ChannelKind> {
        if command == self.header_command {
            Some(ChannelKind::Header)
        } else if command == self.body_command {
            Some(ChannelKind::Body)
        } else {
            None
        }
    }
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            header_command: HEADER,
            body_command: BODY,
            min_line_len: MIN_LINE_LEN,
        }
    }
}

/// Counts collected over one demultiplexing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemuxStats {
    /// Lines read, including blank and short ones.
    pub lines: usize,
    /// Lines long enough to be frames.
    pub frames: usize,
    /// Lines dropped for being shorter than the minimum.
    pub short_lines: usize,
    /// Frames whose command code is not routed to a channel.
    pub ignored_frames: usize,
}

/// Result of a demultiplexing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demuxed {
    pub header: Channel,
    pub body: Channel,
    pub stats: DemuxStats,
}

impl Demuxed {
    pub fn channel(&self, kind: ChannelKind) -> &Channel {
        match kind {
            ChannelKind::Header => &self.header,
            ChannelKind::Body => &self.body,
        }
    }
}

/// Splits capture lines into the header and body channels.
///
/// Never stops early: every line is looked at, and lines that cannot be
/// routed are counted and dropped.
#[derive(Debug, Clone)]
pub struct Demultiplexer {
    config: DemuxConfig,
    header: Channel,
    body: Channel,
    stats: DemuxStats,
}

impl Demultiplexer {
    /// Create a demultiplexer with the built-in routing table.
    pub fn new() -> Self {
        Self::with_config(DemuxConfig::default())
    }

    pub fn with_config(config: DemuxConfig) -> Self {
        Self {
            config,
            header: Channel::new(ChannelKind::Header),
            body: Channel::new(ChannelKind::Body),
            stats: DemuxStats::default(),
        }
    }

    /// Feed one capture line.
    pub fn push_line(&mut self, line: &str) {
        self.stats.lines += 1;

        let frame = match parse_line(line, self.config.min_line_len) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.stats.short_lines += 1;
                tracing::trace!(line = self.stats.lines, "skipping short line");
                return;
            }
            Err(err) => {
                self.stats.frames += 1;
                self.stats.ignored_frames += 1;
                tracing::trace!(line = self.stats.lines, error = %err, "skipping unroutable line");
                return;
            }
        };
        self.stats.frames += 1;

        match self.config.route(frame.command) {
            Some(ChannelKind::Header) => self.header.append(&frame.payload),
            Some(ChannelKind::Body) => self.body.append(&frame.payload),
            None => {
                self.stats.ignored_frames += 1;
                tracing::trace!(
                    line = self.stats.lines,
                    command = frame.command,
                    "ignoring frame on untracked command"
                );
            }
        }
    }

    pub fn stats(&self) -> &DemuxStats {
        &self.stats
    }

    pub fn config(&self) -> &DemuxConfig {
        &self.config
    }

    /// Finish the pass and hand over both channels.
    pub fn finish(self) -> Demuxed {
        tracing::debug!(
            lines = self.stats.lines,
            frames = self.stats.frames,
            short = self.stats.short_lines,
            ignored = self.stats.ignored_frames,
            header_frames = self.header.frames(),
            body_frames = self.body.frames(),
            "demultiplexed capture"
        );
        Demuxed {
            header: self.header,
            body: self.body,
            stats: self.stats,
        }
    }
}

impl Default for Demultiplexer {
    fn default() -> Self {
        Self::new()
    }
}

/// Demultiplex a sequence of capture lines in one call.
pub fn demultiplex<I, S>(lines: I, config: &DemuxConfig) -> Demuxed
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut demux = Demultiplexer::with_config(*config);
    for line in lines {
        demux.push_line(line.as_ref());
    }
    demux.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: [&str; 3] = [
        "42AAAACAFEBABE",
        "44BBBBFFFFFFFFFFFF",
        "44CCCCC20012340000FFFFFFFFFFFF",
    ];

    #[test]
    fn routes_header_and_body() {
        let out = demultiplex(CAPTURE, &DemuxConfig::default());

        assert_eq!(out.header.hex(), "CAFEBABE");
        assert_eq!(out.body.hex(), "FFFFFFFFFFFFC20012340000FFFFFFFFFFFF");
        assert_eq!(out.header.frames(), 1);
        assert_eq!(out.body.frames(), 2);
        assert_eq!(
            out.stats,
            DemuxStats {
                lines: 3,
                frames: 3,
                short_lines: 0,
                ignored_frames: 0,
            }
        );
    }

    #[test]
    fn body_materializes_to_expected_bytes() {
        let out = demultiplex(CAPTURE, &DemuxConfig::default());
        let bytes = out.body.materialize().unwrap();

        assert_eq!(
            bytes.as_ref(),
            &[
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC2, 0x00, 0x12, 0x34, 0x00, 0x00, 0xFF,
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            ]
        );
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let out = demultiplex(
            ["43000012345678", "4400001122334455", "4100"],
            &DemuxConfig::default(),
        );

        assert!(out.header.is_empty());
        assert_eq!(out.body.hex(), "1122334455");
        assert_eq!(out.stats.ignored_frames, 1);
        assert_eq!(out.stats.short_lines, 1);
    }

    #[test]
    fn length_boundary_is_ten_characters() {
        let out = demultiplex(["440000AABB", "440000AAB", ""], &DemuxConfig::default());

        assert_eq!(out.body.hex(), "AABB");
        assert_eq!(out.body.frames(), 1);
        assert_eq!(out.stats.short_lines, 2);
    }

    #[test]
    fn malformed_command_is_counted_and_scan_continues() {
        let out = demultiplex(
            ["ZZ0000AABBCCDD", "440000C2001234"],
            &DemuxConfig::default(),
        );

        assert_eq!(out.stats.frames, 2);
        assert_eq!(out.stats.ignored_frames, 1);
        assert_eq!(out.body.hex(), "C2001234");
    }

    #[test]
    fn routing_table_is_configurable() {
        let config = DemuxConfig {
            header_command: 0x50,
            body_command: 0x51,
            ..DemuxConfig::default()
        };
        let out = demultiplex(["500000AAAA", "510000BBBB", "440000CCCC"], &config);

        assert_eq!(out.header.hex(), "AAAA");
        assert_eq!(out.body.hex(), "BBBB");
        assert_eq!(out.stats.ignored_frames, 1);
    }

    #[test]
    fn empty_input_yields_empty_channels() {
        let out = demultiplex(Vec::<String>::new(), &DemuxConfig::default());
        assert!(out.header.is_empty());
        assert!(out.body.is_empty());
        assert_eq!(out.stats, DemuxStats::default());
    }

    #[test]
    fn channel_lookup_by_kind() {
        let out = demultiplex(CAPTURE, &DemuxConfig::default());
        assert_eq!(out.channel(ChannelKind::Header).hex(), "CAFEBABE");
        assert_eq!(out.channel(ChannelKind::Body).frames(), 2);
    }
}

//! Socket clients for the audio and display backends.
//!
//! Both backends speak newline-delimited JSON: one request object out,
//! one response object back. The protocol is deliberately small: the
//! backends own every detail of playback and rendering, and the handlers
//! only ever need the operations in the `ibusd-core` traits.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use ibusd_core::{AudioController, BackendError, DisplayController, TrackInfo};

use crate::DaemonError;

// ============================================================================
// Line Client
// ============================================================================

/// One request/response JSON line exchange at a time over a TCP stream.
struct LineClient {
    target: &'static str,
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl LineClient {
    fn connect(target: &'static str, addr: &str) -> Result<Self, DaemonError> {
        let stream = TcpStream::connect(addr).map_err(|source| DaemonError::Connect {
            target,
            addr: addr.to_string(),
            source,
        })?;
        let writer = stream.try_clone().map_err(|source| DaemonError::Connect {
            target,
            addr: addr.to_string(),
            source,
        })?;
        Ok(LineClient {
            target,
            reader: BufReader::new(stream),
            writer,
        })
    }

    fn call<Req, Resp>(&mut self, request: &Req) -> Result<Resp, BackendError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let mut line = serde_json::to_string(request)
            .map_err(|err| BackendError::Protocol(err.to_string()))?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;

        let mut reply = String::new();
        let n = self.reader.read_line(&mut reply)?;
        if n == 0 {
            return Err(BackendError::Unavailable(format!(
                "{} closed the connection",
                self.target
            )));
        }
        serde_json::from_str(reply.trim()).map_err(|err| BackendError::Protocol(err.to_string()))
    }
}

// ============================================================================
// Audio Backend
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum AudioRequest<'a> {
    Play,
    Pause,
    Next,
    Previous,
    Seek { offset: i32 },
    Random { seed: u8, toggle: bool },
    TrackId,
    CurrentTrack,
    InfoByPath { path: &'a str },
    AddSong { path: &'a str },
    PlaySong { path: &'a str },
}

#[derive(Debug, Deserialize)]
struct AudioResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    random: Option<bool>,
    #[serde(default)]
    track_id: Option<u32>,
    #[serde(default)]
    track: Option<TrackReply>,
}

#[derive(Debug, Deserialize)]
struct TrackReply {
    id: u32,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    title: String,
}

fn track_from(response: AudioResponse) -> Result<TrackInfo, BackendError> {
    let track = response
        .track
        .ok_or_else(|| BackendError::Protocol("response missing track info".to_string()))?;
    Ok(TrackInfo {
        id: track.id,
        artist: track.artist,
        title: track.title,
    })
}

/// Client for the audio backend.
pub struct AudioClient {
    client: LineClient,
}

impl AudioClient {
    pub fn connect(addr: &str) -> Result<Self, DaemonError> {
        Ok(AudioClient {
            client: LineClient::connect("audio backend", addr)?,
        })
    }

    fn exec(&mut self, request: &AudioRequest<'_>) -> Result<AudioResponse, BackendError> {
        let response: AudioResponse = self.client.call(request)?;
        if response.ok {
            Ok(response)
        } else {
            Err(BackendError::Protocol(response.error.unwrap_or_else(|| {
                "unspecified backend error".to_string()
            })))
        }
    }
}

impl AudioController for AudioClient {
    fn play(&mut self) -> Result<(), BackendError> {
        self.exec(&AudioRequest::Play).map(|_| ())
    }

    fn pause(&mut self) -> Result<(), BackendError> {
        self.exec(&AudioRequest::Pause).map(|_| ())
    }

    fn next(&mut self) -> Result<(), BackendError> {
        self.exec(&AudioRequest::Next).map(|_| ())
    }

    fn previous(&mut self) -> Result<(), BackendError> {
        self.exec(&AudioRequest::Previous).map(|_| ())
    }

    fn seek(&mut self, offset_secs: i32) -> Result<(), BackendError> {
        self.exec(&AudioRequest::Seek {
            offset: offset_secs,
        })
        .map(|_| ())
    }

    fn random(&mut self, seed: u8, toggle: bool) -> Result<bool, BackendError> {
        let response = self.exec(&AudioRequest::Random { seed, toggle })?;
        response
            .random
            .ok_or_else(|| BackendError::Protocol("response missing shuffle mode".to_string()))
    }

    fn track_id(&mut self) -> Result<u32, BackendError> {
        let response = self.exec(&AudioRequest::TrackId)?;
        response
            .track_id
            .ok_or_else(|| BackendError::Protocol("response missing track id".to_string()))
    }

    fn current_track(&mut self) -> Result<TrackInfo, BackendError> {
        let response = self.exec(&AudioRequest::CurrentTrack)?;
        track_from(response)
    }

    fn info_by_path(&mut self, path: &str) -> Result<TrackInfo, BackendError> {
        let response: AudioResponse = self.client.call(&AudioRequest::InfoByPath { path })?;
        if !response.ok {
            // A refused lookup means the path is not in the library.
            return Err(BackendError::TrackNotFound(path.to_string()));
        }
        track_from(response)
    }

    fn add_song(&mut self, path: &str) -> Result<(), BackendError> {
        self.exec(&AudioRequest::AddSong { path }).map(|_| ())
    }

    fn play_song(&mut self, path: &str) -> Result<(), BackendError> {
        self.exec(&AudioRequest::PlaySong { path }).map(|_| ())
    }
}

// ============================================================================
// Display Backend
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum DisplayRequest<'a> {
    SetQueue { lines: &'a [String] },
    ImmediateText { text: &'a str },
    SetPower { on: bool },
}

#[derive(Debug, Deserialize)]
struct DisplayResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the display backend.
pub struct DisplayClient {
    client: LineClient,
}

impl DisplayClient {
    pub fn connect(addr: &str) -> Result<Self, DaemonError> {
        Ok(DisplayClient {
            client: LineClient::connect("display backend", addr)?,
        })
    }

    fn exec(&mut self, request: &DisplayRequest<'_>) -> Result<(), BackendError> {
        let response: DisplayResponse = self.client.call(request)?;
        if response.ok {
            Ok(())
        } else {
            Err(BackendError::Protocol(response.error.unwrap_or_else(|| {
                "unspecified backend error".to_string()
            })))
        }
    }
}

impl DisplayController for DisplayClient {
    fn set_queue(&mut self, lines: &[String]) -> Result<(), BackendError> {
        self.exec(&DisplayRequest::SetQueue { lines })
    }

    fn immediate_text(&mut self, text: &str) -> Result<(), BackendError> {
        self.exec(&DisplayRequest::ImmediateText { text })
    }

    fn set_power(&mut self, on: bool) -> Result<(), BackendError> {
        self.exec(&DisplayRequest::SetPower { on })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_audio_request_wire_shapes() {
        assert_eq!(
            serde_json::to_string(&AudioRequest::Play).expect("serializable"),
            r#"{"op":"play"}"#
        );
        assert_eq!(
            serde_json::to_string(&AudioRequest::Seek { offset: -2 }).expect("serializable"),
            r#"{"op":"seek","offset":-2}"#
        );
        assert_eq!(
            serde_json::to_string(&AudioRequest::InfoByPath { path: "a.mp3" })
                .expect("serializable"),
            r#"{"op":"info_by_path","path":"a.mp3"}"#
        );
        assert_eq!(
            serde_json::to_string(&AudioRequest::Random {
                seed: 0,
                toggle: true
            })
            .expect("serializable"),
            r#"{"op":"random","seed":0,"toggle":true}"#
        );
    }

    #[test]
    fn test_display_request_wire_shapes() {
        let lines = vec!["Artist".to_string(), "Title".to_string()];
        assert_eq!(
            serde_json::to_string(&DisplayRequest::SetQueue { lines: &lines })
                .expect("serializable"),
            r#"{"op":"set_queue","lines":["Artist","Title"]}"#
        );
        assert_eq!(
            serde_json::to_string(&DisplayRequest::SetPower { on: false }).expect("serializable"),
            r#"{"op":"set_power","on":false}"#
        );
    }

    #[test]
    fn test_audio_response_parses_partial_objects() {
        let response: AudioResponse =
            serde_json::from_str(r#"{"ok":true,"track_id":7}"#).expect("valid json");
        assert!(response.ok);
        assert_eq!(response.track_id, Some(7));
        assert!(response.track.is_none());
    }

    #[test]
    fn test_track_id_round_trip_over_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr").to_string();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut line = String::new();
            reader.read_line(&mut line).expect("server read");
            assert_eq!(line.trim(), r#"{"op":"track_id"}"#);
            let mut stream = stream;
            stream
                .write_all(b"{\"ok\":true,\"track_id\":7}\n")
                .expect("server write");
        });

        let mut client = AudioClient::connect(&addr).expect("connect");
        assert_eq!(client.track_id().expect("track id"), 7);
        server.join().expect("server thread");
    }

    #[test]
    fn test_backend_refusal_surfaces_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr").to_string();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut line = String::new();
            reader.read_line(&mut line).expect("server read");
            let mut stream = stream;
            stream
                .write_all(b"{\"ok\":false,\"error\":\"no such path\"}\n")
                .expect("server write");
        });

        let mut client = AudioClient::connect(&addr).expect("connect");
        let err = client.info_by_path("missing.mp3").expect_err("refused");
        assert!(matches!(err, BackendError::TrackNotFound(_)));
        server.join().expect("server thread");
    }
}

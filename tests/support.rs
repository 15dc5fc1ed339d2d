use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

/// Canned answer keyed by `"<METHOD> <uri>"`.
pub type Routes = HashMap<String, (u16, String)>;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server answering from `routes`; unknown routes get 404.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server(routes: Routes) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let routes = Arc::new(routes);
    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let routes = Arc::clone(&routes);
                    thread::spawn(move || handle_client(stream, &routes));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

fn handle_client(mut stream: TcpStream, routes: &Routes) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(key) = read_request(&mut stream) else {
        return;
    };
    let (status, body) = routes
        .get(&key)
        .map_or((404, ""), |(status, body)| (*status, body.as_str()));
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Reads one request and returns its `"<METHOD> <uri>"` key.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        data.extend_from_slice(chunk.get(..read)?);
        if let Some(pos) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(data.get(..head_end)?).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let body_start = head_end.checked_add(4)?;
    let wanted = body_start.checked_add(content_length)?;
    while data.len() < wanted {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            break;
        }
        data.extend_from_slice(chunk.get(..read)?);
    }

    let mut parts = head.lines().next()?.split_whitespace();
    let method = parts.next()?;
    let uri = parts.next()?;
    Some(format!("{} {}", method, uri))
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Unknown",
    }
}

/// Writes a phase corpus under `root` (`ammo/` and `answers/`).
///
/// # Errors
///
/// Returns an error if the files cannot be written.
pub fn write_corpus(root: &Path, phase: u8, ammo: &str, answers: &str) -> Result<(), String> {
    let action = if phase == 2 { "post" } else { "get" };
    let ammo_dir = root.join("ammo");
    let answers_dir = root.join("answers");
    std::fs::create_dir_all(&ammo_dir).map_err(|err| format!("create ammo dir failed: {}", err))?;
    std::fs::create_dir_all(&answers_dir)
        .map_err(|err| format!("create answers dir failed: {}", err))?;
    std::fs::write(
        ammo_dir.join(format!("phase_{}_{}.ammo", phase, action)),
        ammo,
    )
    .map_err(|err| format!("write ammo failed: {}", err))?;
    std::fs::write(
        answers_dir.join(format!("phase_{}_{}.answ", phase, action)),
        answers,
    )
    .map_err(|err| format!("write answers failed: {}", err))?;
    Ok(())
}

/// Run the `ammocheck` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_ammocheck<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = ammocheck_bin()?;
    Command::new(bin)
        .args(args)
        .env("AMMOCHECK_LOG", "error")
        .env_remove("RUST_LOG")
        .env("NO_PROXY", "127.0.0.1,localhost")
        .env("no_proxy", "127.0.0.1,localhost")
        .output()
        .map_err(|err| format!("run ammocheck failed: {}", err))
}

fn ammocheck_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_ammocheck").map_or_else(
        || Err("CARGO_BIN_EXE_ammocheck missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

// End-to-end exercises for the control-connection session loop, run
// against real loopback sockets.

#[cfg(test)]
mod tests {
    use crate::constants::MAX_COMMAND_LINE;
    use crate::core_network::network::handle_connection;
    use crate::session::Session;
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::Mutex;
    use tokio::task::JoinHandle;

    /// Accepts exactly one control connection and runs a session over it,
    /// rooted at `root`. The handle yields the session's exit result.
    async fn spawn_session(root: PathBuf) -> (SocketAddr, JoinHandle<anyhow::Result<()>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let absolute = root.canonicalize().unwrap();
            let session = Arc::new(Mutex::new(Session::new(root, absolute)));
            handle_connection(socket, session).await
        });

        (addr, task)
    }

    struct Control {
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
    }

    impl Control {
        async fn connect(addr: SocketAddr) -> Self {
            let socket = TcpStream::connect(addr).await.unwrap();
            let (read_half, writer) = socket.into_split();
            Self {
                reader: BufReader::new(read_half),
                writer,
            }
        }

        async fn send(&mut self, line: &str) {
            self.writer.write_all(line.as_bytes()).await.unwrap();
            self.writer.write_all(b"\r\n").await.unwrap();
        }

        /// Reads one reply line. An empty string means the server closed
        /// the control connection.
        async fn reply(&mut self) -> String {
            let mut line = String::new();
            self.reader.read_line(&mut line).await.unwrap();
            line
        }
    }

    /// Binds a loopback listener for the server to dial and encodes its
    /// address the way PORT wants it.
    async fn data_listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let arg = format!("127,0,0,1,{},{}", port >> 8, port & 0xff);
        (listener, arg)
    }

    async fn start(scratch: &TempDir) -> Control {
        let (addr, _server) = spawn_session(scratch.path().to_path_buf()).await;
        let mut control = Control::connect(addr).await;
        assert_eq!(control.reply().await, "220 Service ready.\r\n");
        control
    }

    #[tokio::test]
    async fn test_user_logs_in_without_credentials() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("USER alice").await;
        assert_eq!(control.reply().await, "230 User alice logged in.\r\n");

        control.send("USER alice wonderland").await;
        assert_eq!(
            control.reply().await,
            "230 User alice wonderland logged in.\r\n"
        );
    }

    #[tokio::test]
    async fn test_unrecognized_verb_leaves_session_usable() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("FOO").await;
        assert_eq!(control.reply().await, "502 Command not implemented.\r\n");

        // Lowercase verbs are not recognized either.
        control.send("user alice").await;
        assert_eq!(control.reply().await, "502 Command not implemented.\r\n");

        control.send("USER alice").await;
        assert_eq!(control.reply().await, "230 User alice logged in.\r\n");
    }

    #[tokio::test]
    async fn test_blank_lines_are_dropped_without_reply() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("").await;
        control.send("   ").await;
        control.send("USER alice").await;
        assert_eq!(control.reply().await, "230 User alice logged in.\r\n");
    }

    #[tokio::test]
    async fn test_quit_emits_one_221_then_closes() {
        let scratch = tempdir().unwrap();
        let (addr, server) = spawn_session(scratch.path().to_path_buf()).await;
        let mut control = Control::connect(addr).await;
        assert_eq!(control.reply().await, "220 Service ready.\r\n");

        control.send("QUIT").await;
        assert_eq!(
            control.reply().await,
            "221 Service closing control connection.\r\n"
        );
        assert_eq!(control.reply().await, "");

        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_pwd_reports_resolved_directory() {
        let scratch = tempdir().unwrap();
        let resolved = scratch.path().canonicalize().unwrap();
        let mut control = start(&scratch).await;

        control.send("PWD").await;
        assert_eq!(
            control.reply().await,
            format!("257 \"{}\" is the current directory.\r\n", resolved.display())
        );
    }

    #[tokio::test]
    async fn test_cwd_commits_only_on_success() {
        let scratch = tempdir().unwrap();
        std::fs::create_dir(scratch.path().join("inner")).unwrap();
        let resolved = scratch.path().canonicalize().unwrap();
        let mut control = start(&scratch).await;

        control.send("CWD nonexistent").await;
        assert_eq!(control.reply().await, "550 File unavailable.\r\n");

        // The failed change must not leak into PWD.
        control.send("PWD").await;
        assert_eq!(
            control.reply().await,
            format!("257 \"{}\" is the current directory.\r\n", resolved.display())
        );

        control.send("CWD inner").await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("PWD").await;
        assert_eq!(
            control.reply().await,
            format!(
                "257 \"{}\" is the current directory.\r\n",
                resolved.join("inner").display()
            )
        );
    }

    #[tokio::test]
    async fn test_cwd_requires_exactly_one_argument() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("CWD").await;
        assert_eq!(
            control.reply().await,
            "501 Syntax error in parameters or arguments.\r\n"
        );

        control.send("CWD one two").await;
        assert_eq!(
            control.reply().await,
            "501 Syntax error in parameters or arguments.\r\n"
        );
    }

    #[tokio::test]
    async fn test_type_accepts_a_and_i_only() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("TYPE A").await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        // Setting the same type again is a no-op with the same reply.
        control.send("TYPE A").await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("TYPE E").await;
        assert_eq!(
            control.reply().await,
            "504 Command not implemented for that parameter.\r\n"
        );

        control.send("TYPE").await;
        assert_eq!(
            control.reply().await,
            "501 Syntax error in parameters or arguments.\r\n"
        );
    }

    #[tokio::test]
    async fn test_port_validates_its_argument() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("PORT 127,0,0,1,31").await;
        assert_eq!(
            control.reply().await,
            "501 Syntax error in parameters or arguments.\r\n"
        );

        control.send("PORT 999,0,0,1,31,144").await;
        assert_eq!(
            control.reply().await,
            "501 Syntax error in parameters or arguments.\r\n"
        );

        control.send("PORT 127,0,0,1,31,144").await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("LPRT 6,16,...").await;
        assert_eq!(control.reply().await, "200 OK\r\n");
    }

    #[tokio::test]
    async fn test_list_before_port_is_refused_with_425() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("LIST").await;
        assert_eq!(control.reply().await, "150 OK\r\n");
        assert_eq!(
            control.reply().await,
            "425 Can't open data connection.\r\n"
        );
    }

    #[tokio::test]
    async fn test_unreachable_data_peer_is_refused_with_425() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        // Bind a port, then free it again so the dial is refused.
        let (listener, port_arg) = data_listener().await;
        drop(listener);

        control.send(&format!("PORT {}", port_arg)).await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("LIST").await;
        assert_eq!(control.reply().await, "150 OK\r\n");
        assert_eq!(
            control.reply().await,
            "425 Can't open data connection.\r\n"
        );
    }

    #[tokio::test]
    async fn test_list_streams_sorted_names_with_ascii_endings() {
        let scratch = tempdir().unwrap();
        std::fs::write(scratch.path().join("b.txt"), b"").unwrap();
        std::fs::write(scratch.path().join("a.txt"), b"").unwrap();
        let mut control = start(&scratch).await;

        let (listener, port_arg) = data_listener().await;
        control.send(&format!("PORT {}", port_arg)).await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("LIST").await;
        assert_eq!(control.reply().await, "150 OK\r\n");

        let (mut data, _) = listener.accept().await.unwrap();
        let mut listing = Vec::new();
        data.read_to_end(&mut listing).await.unwrap();
        assert_eq!(listing, b"a.txt\r\nb.txt\r\n\r\n");

        assert_eq!(control.reply().await, "226 OK\r\n");
    }

    #[tokio::test]
    async fn test_list_accepts_a_subdirectory_argument() {
        let scratch = tempdir().unwrap();
        std::fs::create_dir(scratch.path().join("inner")).unwrap();
        std::fs::write(scratch.path().join("inner").join("only.txt"), b"").unwrap();
        let mut control = start(&scratch).await;

        let (listener, port_arg) = data_listener().await;
        control.send(&format!("PORT {}", port_arg)).await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("LIST inner").await;
        assert_eq!(control.reply().await, "150 OK\r\n");

        let (mut data, _) = listener.accept().await.unwrap();
        let mut listing = Vec::new();
        data.read_to_end(&mut listing).await.unwrap();
        assert_eq!(listing, b"only.txt\r\n\r\n");

        assert_eq!(control.reply().await, "226 OK\r\n");
    }

    #[tokio::test]
    async fn test_retr_missing_file_fails_before_announcing_data() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("RETR nope.txt").await;
        assert_eq!(control.reply().await, "550 File unavailable.\r\n");
    }

    #[tokio::test]
    async fn test_stor_unwritable_destination_fails_before_announcing_data() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("STOR missing-dir/up.bin").await;
        assert_eq!(control.reply().await, "550 File unavailable.\r\n");
    }

    #[tokio::test]
    async fn test_stor_then_retr_round_trips_content() {
        let scratch = tempdir().unwrap();
        let mut control = start(&scratch).await;

        control.send("TYPE I").await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        let (listener, port_arg) = data_listener().await;
        control.send(&format!("PORT {}", port_arg)).await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("STOR up.bin").await;
        assert_eq!(control.reply().await, "150 OK\r\n");

        let (mut data, _) = listener.accept().await.unwrap();
        data.write_all(b"stored payload").await.unwrap();
        data.shutdown().await.unwrap();
        drop(data);

        assert_eq!(control.reply().await, "226 OK\r\n");
        assert_eq!(
            std::fs::read(scratch.path().join("up.bin")).unwrap(),
            b"stored payload"
        );

        // The registered data peer survives across transfers.
        control.send("RETR up.bin").await;
        assert_eq!(control.reply().await, "150 OK\r\n");

        let (mut data, _) = listener.accept().await.unwrap();
        let mut body = Vec::new();
        data.read_to_end(&mut body).await.unwrap();
        assert_eq!(body, b"stored payload\n");

        assert_eq!(control.reply().await, "226 OK\r\n");
    }

    #[tokio::test]
    async fn test_data_connection_lost_mid_transfer_is_426() {
        let scratch = tempdir().unwrap();
        // Big enough that the transfer cannot fit in socket buffers
        // before the peer disappears.
        std::fs::write(scratch.path().join("big.bin"), vec![0u8; 4 * 1024 * 1024]).unwrap();
        let mut control = start(&scratch).await;

        let (listener, port_arg) = data_listener().await;
        control.send(&format!("PORT {}", port_arg)).await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("RETR big.bin").await;
        assert_eq!(control.reply().await, "150 OK\r\n");

        let (data, _) = listener.accept().await.unwrap();
        drop(data);

        assert_eq!(
            control.reply().await,
            "426 Connection closed; transfer aborted.\r\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_control_connection_is_closed_at_idle_deadline() {
        let scratch = tempdir().unwrap();
        let (addr, server) = spawn_session(scratch.path().to_path_buf()).await;
        let mut control = Control::connect(addr).await;
        assert_eq!(control.reply().await, "220 Service ready.\r\n");

        // No command is ever sent. With the clock paused the idle deadline
        // is the only thing left to fire; the session must close cleanly.
        assert_eq!(control.reply().await, "");
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_oversized_command_line_ends_the_session() {
        let scratch = tempdir().unwrap();
        let (addr, server) = spawn_session(scratch.path().to_path_buf()).await;
        let mut control = Control::connect(addr).await;
        assert_eq!(control.reply().await, "220 Service ready.\r\n");

        // Twice the cap, never a newline. The session must cut the
        // connection loose rather than buffer the line forever; the write
        // may fail part-way once it does.
        let blob = vec![b'A'; 2 * MAX_COMMAND_LINE as usize];
        let _ = control.writer.write_all(&blob).await;

        let mut line = String::new();
        let read = control.reader.read_line(&mut line).await;
        assert!(matches!(read, Ok(0) | Err(_)));

        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_absolute_arguments_stay_anchored_to_the_session_tree() {
        let scratch = tempdir().unwrap();
        std::fs::create_dir(scratch.path().join("inner")).unwrap();
        let resolved = scratch.path().canonicalize().unwrap();
        let mut control = start(&scratch).await;

        control.send("CWD /inner").await;
        assert_eq!(control.reply().await, "200 OK\r\n");

        control.send("PWD").await;
        assert_eq!(
            control.reply().await,
            format!(
                "257 \"{}\" is the current directory.\r\n",
                resolved.join("inner").display()
            )
        );
    }
}

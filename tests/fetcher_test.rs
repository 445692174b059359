use pop_corpus::pop3::Session;
use pop_corpus::*;
use secrecy::SecretString;
use std::io::{self, Cursor, Read, Write};

/// Plays back a canned server transcript and records what the client sent.
#[derive(Debug)]
struct ScriptedServer {
    replies: Cursor<Vec<u8>>,
    sent: Vec<u8>,
}

impl ScriptedServer {
    fn new(replies: &str) -> Self {
        Self {
            replies: Cursor::new(replies.as_bytes().to_vec()),
            sent: Vec::new(),
        }
    }
}

impl Read for ScriptedServer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.replies.read(buf)
    }
}

impl Write for ScriptedServer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sent.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Wraps a shared transcript so the test can inspect it after the session
/// has been consumed.
struct Shared<'a>(&'a mut ScriptedServer);

impl Read for Shared<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl Write for Shared<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

fn config(max: Option<usize>) -> SessionConfig {
    SessionConfig::new("pop.example.com", "alice", SecretString::from("s3cret")).max_messages(max)
}

fn message(n: u32) -> String {
    format!("From: sender{n}@example.com\r\nSubject: Message {n}\r\n\r\nBody {n}\r\n.\r\n")
}

fn list_reply(count: u32) -> String {
    let mut reply = format!("+OK {count} messages\r\n");
    for i in 1..=count {
        reply.push_str(&format!("{i} {}\r\n", 100 + i));
    }
    reply.push_str(".\r\n");
    reply
}

fn run(script: &str, config: &SessionConfig) -> (Result<Vec<FetchedMessage>>, String) {
    let mut server = ScriptedServer::new(script);
    let result = Session::start(Shared(&mut server))
        .and_then(|session| fetch_with_session(session, config));
    (result, String::from_utf8(server.sent).unwrap())
}

#[test]
fn test_fetches_newest_first_up_to_max() {
    let mut script = String::from("+OK POP3 ready\r\n+OK\r\n+OK\r\n");
    script.push_str(&list_reply(5));
    for n in [5, 4, 3] {
        script.push_str("+OK\r\n");
        script.push_str(&message(n));
    }
    script.push_str("+OK bye\r\n");

    let (result, sent) = run(&script, &config(Some(3)));
    let messages = result.unwrap();

    let indices: Vec<u32> = messages.iter().map(|m| m.envelope.index).collect();
    assert_eq!(indices, [5, 4, 3]);
    assert_eq!(messages[0].envelope.size, 105);
    assert_eq!(messages[0].tree.headers.get("Subject"), Some("Message 5"));

    assert_eq!(
        sent,
        "USER alice\r\nPASS s3cret\r\nLIST\r\nRETR 5\r\nRETR 4\r\nRETR 3\r\nQUIT\r\n"
    );
}

#[test]
fn test_fewer_messages_than_max() {
    let mut script = String::from("+OK\r\n+OK\r\n+OK\r\n");
    script.push_str(&list_reply(2));
    for n in [2, 1] {
        script.push_str("+OK\r\n");
        script.push_str(&message(n));
    }
    script.push_str("+OK\r\n");

    let (result, _) = run(&script, &config(Some(10)));
    let indices: Vec<u32> = result.unwrap().iter().map(|m| m.envelope.index).collect();
    assert_eq!(indices, [2, 1]);
}

#[test]
fn test_max_zero_lists_but_retrieves_nothing() {
    let mut script = String::from("+OK\r\n+OK\r\n+OK\r\n");
    script.push_str(&list_reply(3));
    script.push_str("+OK\r\n");

    let (result, sent) = run(&script, &config(Some(0)));
    assert!(result.unwrap().is_empty());
    assert_eq!(sent, "USER alice\r\nPASS s3cret\r\nLIST\r\nQUIT\r\n");
}

#[test]
fn test_rejected_password_aborts_but_still_quits() {
    let script = "+OK\r\n+OK\r\n-ERR [AUTH] invalid credentials\r\n+OK\r\n";

    let (result, sent) = run(script, &config(None));
    assert!(matches!(result, Err(Error::Authentication(_))));
    assert_eq!(sent, "USER alice\r\nPASS s3cret\r\nQUIT\r\n");
}

#[test]
fn test_quit_failure_does_not_mask_success() {
    let mut script = String::from("+OK\r\n+OK\r\n+OK\r\n");
    script.push_str(&list_reply(1));
    script.push_str("+OK\r\n");
    script.push_str(&message(1));
    // Connection drops before the QUIT reply.

    let (result, sent) = run(&script, &config(None));
    assert_eq!(result.unwrap().len(), 1);
    assert!(sent.ends_with("QUIT\r\n"));
}

#[test]
fn test_failed_retrieval_propagates() {
    let mut script = String::from("+OK\r\n+OK\r\n+OK\r\n");
    script.push_str(&list_reply(2));
    script.push_str("-ERR no such message\r\n+OK\r\n");

    let (result, sent) = run(&script, &config(None));
    assert!(matches!(result, Err(Error::Server { ref command, .. }) if command == "RETR"));
    assert!(sent.ends_with("RETR 2\r\nQUIT\r\n"));
}

#[test]
fn test_delete_after_fetch_marks_all_retrieved() {
    let mut script = String::from("+OK\r\n+OK\r\n+OK\r\n");
    script.push_str(&list_reply(2));
    for n in [2, 1] {
        script.push_str("+OK\r\n");
        script.push_str(&message(n));
    }
    script.push_str("+OK\r\n+OK\r\n+OK\r\n");

    let config = config(None).delete_after_fetch(true);
    let (result, sent) = run(&script, &config);
    assert_eq!(result.unwrap().len(), 2);
    assert!(sent.ends_with("RETR 2\r\nRETR 1\r\nDELE 2\r\nDELE 1\r\nQUIT\r\n"));
}

#[test]
fn test_malformed_listing_is_protocol_error() {
    let script = "+OK\r\n+OK\r\n+OK\r\n+OK\r\nnot-a-number 12\r\n.\r\n+OK\r\n";

    let (result, _) = run(script, &config(None));
    assert!(matches!(result, Err(Error::Protocol(_))));
}

#[test]
fn test_end_to_end_records() {
    let mime = "From: Shop <deals@shop.example>\r\n\
                Subject: =?UTF-8?Q?50=25_off?=\r\n\
                Content-Type: multipart/alternative; boundary=\"b\"\r\n\
                \r\n\
                --b\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <p>Hello, World!!!</p><p>Buy NOW.</p>\r\n\
                --b--\r\n\
                .\r\n";
    let mut script = String::from("+OK\r\n+OK\r\n+OK\r\n");
    script.push_str(&list_reply(1));
    script.push_str("+OK\r\n");
    script.push_str(mime);
    script.push_str("+OK\r\n");

    let (result, _) = run(&script, &config(None));
    let messages = result.unwrap();
    let record = NormalizedRecord::from_tree(&messages[0].tree);

    assert_eq!(record.subject, "50% off");
    assert_eq!(record.from_name, "Shop");
    assert_eq!(record.body, "Hello, World!!!\nBuy NOW.");
    assert_eq!(corpus_line(&messages[0].tree), "hello world buy now");
}

#[test]
fn test_select_newest() {
    let envelopes = vec![
        Envelope { index: 2, size: 10 },
        Envelope { index: 9, size: 10 },
        Envelope { index: 4, size: 10 },
    ];

    let all: Vec<u32> = select_newest(envelopes.clone(), None)
        .iter()
        .map(|e| e.index)
        .collect();
    assert_eq!(all, [9, 4, 2]);

    let two: Vec<u32> = select_newest(envelopes, Some(2))
        .iter()
        .map(|e| e.index)
        .collect();
    assert_eq!(two, [9, 4]);
}

//! End-to-end dispatch through the standard chain.

use std::sync::{Arc, Mutex};

use ircline::chain::{standard_chain, Client, ClientConfig, CommandRouter, CtcpDispatcher};
use ircline::{CapState, IsupportValue, Result, StandardChain, Transport};

#[derive(Debug, Default)]
struct RecordingTransport {
    lines: Vec<String>,
}

impl Transport for RecordingTransport {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_owned());
        Ok(())
    }
}

fn client(
    config: ClientConfig,
) -> (Client<RecordingTransport, StandardChain>, Arc<Mutex<Vec<String>>>) {
    let entries = Arc::new(Mutex::new(Vec::new()));

    let mut router = CommandRouter::new();
    {
        let entries = entries.clone();
        router.on("PRIVMSG", move |_, msg| {
            entries
                .lock()
                .unwrap()
                .push(format!("privmsg {} {}", msg.params[0], msg.params[1]));
            Ok(())
        });
    }
    {
        let entries = entries.clone();
        router.on_unhandled(move |_, msg| {
            entries
                .lock()
                .unwrap()
                .push(format!("unhandled {}", msg.command));
            Ok(())
        });
    }

    let mut ctcp = CtcpDispatcher::new(router);
    ctcp.on("VERSION", |sender, query| {
        query.reply(sender, "VERSION", Some("ircline 0.3"))
    });

    let chain = standard_chain(config, ctcp);
    (Client::new(RecordingTransport::default(), chain), entries)
}

#[test]
fn connect_sends_cap_ls_then_registration() {
    let mut config = ClientConfig::new("wiz");
    config.password = Some("hunter2".to_owned());
    config.realname = "The Wizard".to_owned();
    let (mut client, _) = client(config);

    client.connected().unwrap();
    assert_eq!(
        client.transport().lines,
        vec![
            "CAP :LS\r\n",
            "PASS :hunter2\r\n",
            "NICK :wiz\r\n",
            "USER wiz 0 * :The Wizard\r\n",
        ]
    );
}

#[test]
fn full_negotiation_and_sign_on() {
    let mut config = ClientConfig::new("wiz");
    config.request_caps = vec!["server-time".to_owned(), "sasl".to_owned()];
    let (mut client, _) = client(config);

    client.connected().unwrap();
    client
        .data_received(b":srv CAP * LS :sasl multi-prefix server-time\r\n")
        .unwrap();
    client.data_received(b":srv CAP * ACK :server-time sasl\r\n").unwrap();
    client.data_received(b":srv 001 wiz :Welcome to TestNet\r\n").unwrap();

    let sent = &client.transport().lines;
    assert_eq!(sent[sent.len() - 2], "CAP REQ :server-time sasl\r\n");
    assert_eq!(sent[sent.len() - 1], "CAP :END\r\n");

    let caps = client.chain();
    assert_eq!(caps.state(), CapState::Negotiated);
    assert_eq!(caps.requested(), ["server-time", "sasl"]);
    assert_eq!(caps.next().nickname(), "wiz");
}

#[test]
fn ping_answered_with_token_verbatim() {
    let (mut client, entries) = client(ClientConfig::new("wiz"));
    client.data_received(b"PING :irc.example.org\r\n").unwrap();
    assert_eq!(client.transport().lines, vec!["PONG :irc.example.org\r\n"]);
    // Handled in the base layer; the router never saw it.
    assert!(entries.lock().unwrap().is_empty());
}

#[test]
fn isupport_accumulates_across_lines() {
    let (mut client, _) = client(ClientConfig::new("wiz"));
    client
        .data_received(b":srv 005 wiz PREFIX=(ov)@+ CHANTYPES=# :are supported by this server\r\n")
        .unwrap();
    client
        .data_received(b":srv 005 wiz NETWORK=TestNet TARGMAX=NAMES:1,LIST:1 :are supported by this server\r\n")
        .unwrap();

    let base = client.chain().next();
    assert_eq!(base.prefix_map().unwrap().symbols(), "@+");
    assert!(base.isupport().contains("CHANTYPES"));
    assert_eq!(
        base.isupport().get("NETWORK"),
        Some(&IsupportValue::List(vec!["TestNet".to_owned()]))
    );
    assert!(matches!(
        base.isupport().get("TARGMAX"),
        Some(IsupportValue::Map(_))
    ));
}

#[test]
fn messages_dispatch_in_arrival_order() {
    let (mut client, entries) = client(ClientConfig::new("wiz"));
    client
        .data_received(
            b":a!u@h PRIVMSG #chan :first\r\n:srv 372 wiz :motd\r\n:b!u@h PRIVMSG #chan :second\r\n",
        )
        .unwrap();
    assert_eq!(
        *entries.lock().unwrap(),
        vec!["privmsg #chan first", "unhandled 372", "privmsg #chan second"]
    );
}

#[test]
fn ctcp_version_gets_a_notice_reply() {
    let (mut client, entries) = client(ClientConfig::new("wiz"));
    client
        .data_received(b":asker!u@h PRIVMSG wiz :\x01VERSION\x01\r\n")
        .unwrap();
    assert_eq!(
        client.transport().lines,
        vec!["NOTICE asker :\x01VERSION ircline 0.3\x01\r\n"]
    );
    // Intercepted before the router's PRIVMSG handler.
    assert!(entries.lock().unwrap().is_empty());
}

#[test]
fn unmatched_command_hits_fallback_exactly_once() {
    let (mut client, entries) = client(ClientConfig::new("wiz"));
    client.data_received(b":srv 372 wiz :some motd line\r\n").unwrap();
    assert_eq!(*entries.lock().unwrap(), vec!["unhandled 372"]);
}

#[test]
fn self_nick_change_tracked_through_the_chain() {
    let (mut client, _) = client(ClientConfig::new("wiz"));
    client.data_received(b":wiz!u@h NICK :merlin\r\n").unwrap();
    assert_eq!(client.chain().next().nickname(), "merlin");
}

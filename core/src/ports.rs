//! TCP service name <-> port number lookups.

/// Well-known TCP services. The first entry for a number is its canonical name;
/// later entries with the same number are accepted aliases.
const TCP_SERVICES: &[(&str, u16)] = &[
    ("TCPMUX", 1),
    ("ECHO", 7),
    ("DISCARD", 9),
    ("SYSTAT", 11),
    ("DAYTIME", 13),
    ("QOTD", 17),
    ("CHARGEN", 19),
    ("FTP-DATA", 20),
    ("FTP", 21),
    ("SSH", 22),
    ("TELNET", 23),
    ("SMTP", 25),
    ("TIME", 37),
    ("NICNAME", 43),
    ("WHOIS", 43),
    ("TACACS", 49),
    ("DOMAIN", 53),
    ("DNS", 53),
    ("GOPHER", 70),
    ("FINGER", 79),
    ("HTTP", 80),
    ("WWW", 80),
    ("WWW-HTTP", 80),
    ("KERBEROS", 88),
    ("POP3", 110),
    ("SUNRPC", 111),
    ("AUTH", 113),
    ("NNTP", 119),
    ("NTP", 123),
    ("EPMAP", 135),
    ("NETBIOS-NS", 137),
    ("NETBIOS-DGM", 138),
    ("NETBIOS-SSN", 139),
    ("IMAP", 143),
    ("SNMP", 161),
    ("SNMPTRAP", 162),
    ("BGP", 179),
    ("IRC", 194),
    ("LDAP", 389),
    ("HTTPS", 443),
    ("MICROSOFT-DS", 445),
    ("KPASSWD", 464),
    ("SUBMISSIONS", 465),
    ("URD", 465),
    ("EXEC", 512),
    ("LOGIN", 513),
    ("SHELL", 514),
    ("PRINTER", 515),
    ("RTSP", 554),
    ("SUBMISSION", 587),
    ("IPP", 631),
    ("LDAPS", 636),
    ("RSYNC", 873),
    ("FTPS-DATA", 989),
    ("FTPS", 990),
    ("TELNETS", 992),
    ("IMAPS", 993),
    ("POP3S", 995),
    ("SOCKS", 1080),
    ("OPENVPN", 1194),
    ("MS-SQL-S", 1433),
    ("MS-SQL-M", 1434),
    ("ORACLE", 1521),
    ("PPTP", 1723),
    ("RADIUS", 1812),
    ("RADIUS-ACCT", 1813),
    ("NFS", 2049),
    ("DOCKER", 2375),
    ("DOCKER-S", 2376),
    ("SQUID-HTTP", 3128),
    ("MYSQL", 3306),
    ("MS-WBT-SERVER", 3389),
    ("RDP", 3389),
    ("SVN", 3690),
    ("SIP", 5060),
    ("SIPS", 5061),
    ("POSTGRESQL", 5432),
    ("AMQP", 5672),
    ("VNC", 5900),
    ("WSMAN", 5985),
    ("WSMANS", 5986),
    ("X11", 6000),
    ("REDIS", 6379),
    ("IRCU", 6667),
    ("HTTP-ALT", 8080),
    ("PCSYNC-HTTPS", 8443),
    ("GIT", 9418),
    ("MEMCACHE", 11211),
    ("MONGODB", 27017),
    ("RJE", 5),
    ("MSP", 18),
    ("NSW-FE", 27),
    ("RAP", 38),
    ("RLP", 39),
    ("GRAPHICS", 41),
    ("NAMESERVER", 42),
    ("XNS-TIME", 52),
    ("MTP", 57),
    ("BOOTPS", 67),
    ("BOOTPC", 68),
    ("TFTP", 69),
    ("HTTP-ALT-81", 81),
    ("SUPDUP", 95),
    ("HOSTNAME", 101),
    ("ISO-TSAP", 102),
    ("CSNET-NS", 105),
    ("RTELNET", 107),
    ("POP2", 109),
    ("SFTP", 115),
    ("UUCP-PATH", 117),
    ("SQLSERV", 118),
    ("LOC-SRV", 135),
    ("SGMP", 153),
    ("XDMCP", 177),
    ("NEXTSTEP", 178),
    ("PROSPERO", 191),
    ("SMUX", 199),
    ("AT-RTMP", 201),
    ("QMTP", 209),
    ("Z39-50", 210),
    ("IPX", 213),
    ("IMAP3", 220),
    ("SVRLOC", 427),
    ("SNPP", 444),
    ("ISAKMP", 500),
    ("BIFF", 512),
    ("WHO", 513),
    ("SYSLOG", 514),
    ("TALK", 517),
    ("NTALK", 518),
    ("ROUTE", 520),
    ("TIMED", 525),
    ("TEMPO", 526),
    ("COURIER", 530),
    ("CONFERENCE", 531),
    ("NETNEWS", 532),
    ("NETWALL", 533),
    ("UUCP", 540),
    ("KLOGIN", 543),
    ("KSHELL", 544),
    ("DHCPV6-CLIENT", 546),
    ("DHCPV6-SERVER", 547),
    ("AFPOVERTCP", 548),
    ("REMOTEFS", 556),
    ("NNTPS", 563),
    ("WHOAMI", 565),
    ("HTTP-RPC-EPMAP", 593),
    ("LDP", 646),
    ("MAC-SRVR-ADMIN", 660),
    ("KERBEROS-ADM", 749),
    ("WEBSTER", 765),
    ("PHONEBOOK", 767),
    ("VMWARE-AUTH", 902),
    ("KERBEROS-IV", 750),
    ("ISCSI", 860),
    ("DOMAIN-S", 853),
    ("NETCONF-SSH", 830),
    ("OPENVPN-ADMIN", 1195),
    ("ICA", 1494),
    ("WINS", 1512),
    ("INGRESLOCK", 1524),
    ("L2TP", 1701),
    ("H323HOSTCALL", 1720),
    ("MQTT", 1883),
    ("SSDP", 1900),
    ("HSRP", 1985),
    ("CISCO-SCCP", 2000),
    ("ZEPHYR-SRV", 2102),
    ("ETCD-CLIENT", 2379),
    ("ETCD-SERVER", 2380),
    ("ICPV2", 3130),
    ("ISCSI-TARGET", 3260),
    ("GLOBALCATLDAP", 3268),
    ("GLOBALCATLDAPSSL", 3269),
    ("DISTCC", 3632),
    ("DAAP", 3689),
    ("EPMD", 4369),
    ("NAT-T-IKE", 4500),
    ("COMMPLEX-MAIN", 5000),
    ("MDNS", 5353),
    ("LLMNR", 5355),
    ("XMPP-CLIENT", 5222),
    ("XMPP-SERVER", 5269),
    ("AMQPS", 5671),
    ("COUCHDB", 5984),
    ("X11-1", 6001),
    ("KUBERNETES-API", 6443),
    ("IRCS-U", 6697),
    ("AFS3-FILESERVER", 7000),
    ("AFS3-CALLBACK", 7001),
    ("HTTP-ALT-8000", 8000),
    ("HTTP-MGMT", 8008),
    ("SQUID", 3128),
    ("WEBCACHE", 8080),
    ("JENKINS", 8081),
    ("CONSUL-HTTP", 8500),
    ("SECURE-MQTT", 8883),
    ("CSLISTENER", 9000),
    ("PROMETHEUS", 9090),
    ("KAFKA", 9092),
    ("WAP-WSP", 9200),
    ("XMLTEC-XMLMAIL", 9091),
    ("JETDIRECT", 9100),
    ("WAP-WSP-WTP", 9201),
    ("ELASTICSEARCH", 9300),
    ("NDMP", 10000),
    ("ZABBIX-AGENT", 10050),
    ("ZABBIX-TRAPPER", 10051),
    ("AMANDA", 10080),
    ("RABBITMQ-MGMT", 15672),
    ("MONGODB-SHARD", 27018),
];

/// Outcome of turning a port token into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortNumber {
    /// Zero when the token is an unknown name.
    pub number: i64,
    pub known: bool,
}

impl PortNumber {
    pub fn is_numeric_token(token: &str) -> bool {
        parse_integer(token).is_some()
    }
}

/// Base-10 integer literal with an optional sign. Literals beyond the `i64`
/// range saturate, so they still read as numbers and fail the port range check.
fn parse_integer(token: &str) -> Option<i64> {
    let t = token.trim();
    let (negative, digits) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(t.parse::<i64>().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Resolve a port token. Integer literals are taken as-is, anything else is a
/// case-insensitive service name.
pub fn resolve_number(token: &str) -> PortNumber {
    if let Some(n) = parse_integer(token) {
        return PortNumber { number: n, known: true };
    }
    let wanted = token.to_ascii_uppercase();
    TCP_SERVICES
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|&(_, n)| PortNumber { number: i64::from(n), known: true })
        .unwrap_or(PortNumber { number: 0, known: false })
}

/// Canonical service name for a port number, or an empty string.
pub fn resolve_name(number: i64) -> String {
    TCP_SERVICES
        .iter()
        .find(|&&(_, n)| i64::from(n) == number)
        .map(|(name, _)| name.to_string())
        .unwrap_or_default()
}

//! Embedded Zenoh transport configuration skeletons.
//!
//! `@NAME@` markers are replaced textually; the surrounding structure is
//! fixed.

pub const ROUTER: &str = r#"{
  mode: "router",
  listen: {
    endpoints: ["@LISTEN_ENDPOINT@"],
  },
  connect: {
    endpoints: ["@CONNECT_ENDPOINT@"],
  },
  transport: {
    link: {
      protocols: @PROTOCOLS@,
      tls: {
        root_ca_certificate: "@ROOT_CA_CERTIFICATE@",
        listen_private_key: "@LISTEN_PRIVATE_KEY@",
        listen_certificate: "@LISTEN_CERTIFICATE@",
        connect_private_key: "@CONNECT_PRIVATE_KEY@",
        connect_certificate: "@CONNECT_CERTIFICATE@",
        enable_mtls: true,
      },
    },
  },
}
"#;

pub const PEER: &str = r#"{
  mode: "peer",
  connect: {
    endpoints: ["@CONNECT_ENDPOINT@"],
  },
  transport: {
    link: {
      protocols: @PROTOCOLS@,
      tls: {
        root_ca_certificate: "@ROOT_CA_CERTIFICATE@",
        connect_private_key: "@CONNECT_PRIVATE_KEY@",
        connect_certificate: "@CONNECT_CERTIFICATE@",
        enable_mtls: true,
      },
    },
  },
}
"#;

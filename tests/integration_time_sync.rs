//! 集成测试：服务器时间同步
//!
//! 使用本地 TCP 桩服务器模拟 QueryTime 接口，不依赖真实网络。

#![cfg(feature = "time-sync")]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use steamguard::Error;
use steamguard::error::TimeSyncError;
use steamguard::guard::current_timestamp;
use steamguard::time_sync::{TimeSync, TimeSyncConfig};

/// 启动只处理一次请求的桩服务器，返回接口地址和收到的原始请求
fn stub_server(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        String::from_utf8_lossy(&request).into_owned()
    });

    (
        format!("http://{}/ITwoFactorService/QueryTime/v1/", addr),
        handle,
    )
}

fn time_sync(endpoint: &str) -> TimeSync {
    TimeSync::new(
        TimeSyncConfig::new()
            .with_endpoint(endpoint)
            .with_timeout(Duration::from_secs(5)),
    )
    .expect("Client creation should succeed")
}

/// 测试成功查询时计算偏移量，且请求为空 POST
#[test]
fn test_query_offset_success() {
    let server_time = current_timestamp() + 120;
    let body = format!(
        r#"{{"response":{{"server_time":"{}","skew_tolerance_seconds":"60"}}}}"#,
        server_time
    );
    let (endpoint, handle) = stub_server("200 OK", body);

    let offset = time_sync(&endpoint)
        .query_offset()
        .expect("Offset should be available");
    assert!((118..=120).contains(&offset), "offset was {}", offset);

    let request = handle.join().unwrap();
    assert!(request.starts_with("POST /ITwoFactorService/QueryTime/v1/ "));
    assert!(request.to_ascii_lowercase().contains("content-length: 0"));
}

/// 测试数字形式的 server_time
#[test]
fn test_fetch_numeric_server_time() {
    let (endpoint, handle) = stub_server(
        "200 OK",
        r#"{"response":{"server_time":1700000000}}"#.to_string(),
    );

    let server_time = time_sync(&endpoint).fetch_server_time().unwrap();
    assert_eq!(server_time, 1700000000);
    handle.join().unwrap();
}

/// 测试非成功状态码
#[test]
fn test_bad_status_is_unavailable() {
    let (endpoint, handle) = stub_server("503 Service Unavailable", "{}".to_string());
    let sync = time_sync(&endpoint);

    let err = sync.fetch_server_time().unwrap_err();
    assert!(matches!(err, Error::TimeSync(TimeSyncError::Status(503))));
    handle.join().unwrap();
}

/// 测试缺少字段与非 JSON 响应都折叠为 None
#[test]
fn test_malformed_responses_are_unavailable() {
    for body in [r#"{"response":{}}"#, "not json", ""] {
        let (endpoint, handle) = stub_server("200 OK", body.to_string());
        assert_eq!(time_sync(&endpoint).query_offset(), None, "body {:?}", body);
        handle.join().unwrap();
    }
}

/// 测试超出范围的服务器时间折叠为 None 而不是溢出
#[test]
fn test_out_of_range_server_time_is_unavailable() {
    for body in [
        r#"{"response":{"server_time":"-9223372036854775808"}}"#,
        r#"{"response":{"server_time":"-1"}}"#,
    ] {
        let (endpoint, handle) = stub_server("200 OK", body.to_string());
        assert_eq!(time_sync(&endpoint).query_offset(), None, "body {:?}", body);
        handle.join().unwrap();
    }

    // 正向极大值不会使偏移量计算溢出
    let (endpoint, handle) = stub_server(
        "200 OK",
        format!(r#"{{"response":{{"server_time":"{}"}}}}"#, i64::MAX),
    );
    let offset = time_sync(&endpoint).query_offset().expect("Offset should be available");
    assert!(offset > 0);
    handle.join().unwrap();
}

/// 测试连接失败
#[test]
fn test_connection_refused_is_unavailable() {
    // 绑定后立即释放端口，使连接被拒绝
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let sync = time_sync(&format!("http://{}/", addr));

    let err = sync.fetch_server_time().unwrap_err();
    assert!(matches!(err, Error::TimeSync(TimeSyncError::Transport(_))));
    assert_eq!(sync.query_offset(), None);
}

/// 测试超时
#[test]
fn test_timeout_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        // 接受连接但不响应
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(2));
        drop(stream);
    });

    let sync = TimeSync::new(
        TimeSyncConfig::new()
            .with_endpoint(format!("http://{}/", addr))
            .with_timeout(Duration::from_millis(200)),
    )
    .unwrap();
    assert_eq!(sync.query_offset(), None);
    handle.join().unwrap();
}

//! In-process JSON-RPC node for tests.

use crate::Vault;
use axum::{extract::State, routing::post, Json, Router};
use ethers::{
    abi::{encode, Token},
    providers::{Http, Provider},
    types::{Address, Bytes, TransactionReceipt, H256, U256, U64},
    utils::{hex, id, keccak256},
};
use reverso_types::RawTransfer;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::SocketAddr,
    str::FromStr,
    sync::{Arc, Mutex},
};

pub(crate) const VAULT: &str = "0x3D1f9d1cEaf350885A91f7Fb05c99a78Bc544ED8";
pub(crate) const RECIPIENT: &str = "0xb9279e38f6eab17f986E7133C60a46DE527628e3";

/// Pending transfer #2 of 0.5 ETH, unlocked an hour after creation.
pub(crate) fn sample_transfer() -> RawTransfer {
    (
        Address::repeat_byte(0x11),
        Address::from_str(RECIPIENT).unwrap(),
        Address::zero(),
        U256::exp10(17) * 5,
        U256::from(1_700_000_000u64),
        U256::from(1_700_003_600u64),
        U256::from(1_702_592_000u64),
        Address::zero(),
        Address::zero(),
        "Quick test transfer".to_string(),
        0,
        false,
    )
}

fn encode_transfer(raw: &RawTransfer) -> Vec<u8> {
    encode(&[
        Token::Address(raw.0),
        Token::Address(raw.1),
        Token::Address(raw.2),
        Token::Uint(raw.3),
        Token::Uint(raw.4),
        Token::Uint(raw.5),
        Token::Uint(raw.6),
        Token::Address(raw.7),
        Token::Address(raw.8),
        Token::String(raw.9.clone()),
        Token::Uint(U256::from(raw.10)),
        Token::Bool(raw.11),
    ])
}

/// Scripted chain state served by [`MockNode`].
pub(crate) struct MockState {
    pub transfer: RawTransfer,
    /// `None` makes `canClaim` fail as if the selector were missing.
    pub can_claim: Option<bool>,
    /// Revert payload returned by a simulated `claim`.
    pub claim_revert: Option<Vec<u8>>,
    /// Node-side error (no revert data) returned by a simulated `claim`.
    pub claim_error: Option<String>,
    pub balances: HashMap<Address, U256>,
    pub gas_price: U256,
    pub nonce: U256,
    /// Rejects `eth_sendRawTransaction` with this message.
    pub reject_raw: Option<String>,
    pub receipt_status: u64,
    pub gas_used: U256,
    /// Receipt lookups answered with `null` before the receipt shows up.
    pub pending_polls: usize,
    pub calls: Vec<String>,
    pub raw_transactions: Vec<Bytes>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            transfer: sample_transfer(),
            can_claim: Some(true),
            claim_revert: None,
            claim_error: None,
            balances: HashMap::new(),
            gas_price: U256::from(2_000_000_000u64),
            nonce: U256::zero(),
            reject_raw: None,
            receipt_status: 1,
            gas_used: U256::from(61_234u64),
            pending_polls: 0,
            calls: Vec::new(),
            raw_transactions: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

pub(crate) struct MockNode {
    pub url: String,
    state: Shared,
    server_handle: tokio::task::JoinHandle<()>,
}

impl MockNode {
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let router = Router::new()
            .route("/", post(handle))
            .with_state(state.clone());

        // Start server on random port
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url,
            state,
            server_handle,
        }
    }

    pub fn vault(&self) -> Vault {
        let provider = Provider::<Http>::try_from(self.url.as_str()).unwrap();
        Vault::new(provider, Address::from_str(VAULT).unwrap())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn raw_transactions(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().raw_transactions.clone()
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

async fn handle(State(state): State<Shared>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();

    let mut state = state.lock().unwrap();
    let outcome = dispatch(&mut state, &method, &params);
    let body = match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    };
    Json(body)
}

fn decode_hex(value: &Value) -> Vec<u8> {
    let text = value.as_str().unwrap_or_default();
    hex::decode(text.trim_start_matches("0x")).unwrap_or_default()
}

fn dispatch(state: &mut MockState, method: &str, params: &Value) -> Result<Value, Value> {
    match method {
        "eth_call" => {
            state.calls.push(method.to_string());
            let call = &params[0];
            let input = if call.get("input").is_some() {
                decode_hex(&call["input"])
            } else {
                decode_hex(&call["data"])
            };
            let selector = input.get(..4).unwrap_or_default();
            if selector == id("transfers(uint256)") {
                Ok(json!(Bytes::from(encode_transfer(&state.transfer))))
            } else if selector == id("canClaim(uint256)") {
                match state.can_claim {
                    Some(answer) => Ok(json!(Bytes::from(encode(&[Token::Bool(answer)])))),
                    None => Err(json!({ "code": 3, "message": "execution reverted", "data": "0x" })),
                }
            } else if selector == id("claim(uint256)") {
                if let Some(message) = &state.claim_error {
                    return Err(json!({ "code": -32000, "message": message }));
                }
                match &state.claim_revert {
                    Some(data) => Err(json!({
                        "code": 3,
                        "message": "execution reverted",
                        "data": format!("0x{}", hex::encode(data)),
                    })),
                    None => Ok(json!("0x")),
                }
            } else {
                Err(json!({ "code": -32000, "message": "unknown selector" }))
            }
        }
        "eth_getBalance" => {
            state.calls.push(method.to_string());
            let account = params[0]
                .as_str()
                .and_then(|text| Address::from_str(text).ok())
                .unwrap_or_default();
            let balance = state.balances.get(&account).copied().unwrap_or_default();
            Ok(json!(balance))
        }
        "eth_gasPrice" => {
            state.calls.push(method.to_string());
            Ok(json!(state.gas_price))
        }
        "eth_getTransactionCount" => {
            let tag = params[1].as_str().unwrap_or("latest");
            state.calls.push(format!("{method}:{tag}"));
            Ok(json!(state.nonce))
        }
        "eth_sendRawTransaction" => {
            state.calls.push(method.to_string());
            let raw = decode_hex(&params[0]);
            if let Some(message) = &state.reject_raw {
                return Err(json!({ "code": -32000, "message": message }));
            }
            let hash = H256::from(keccak256(&raw));
            state.raw_transactions.push(Bytes::from(raw));
            Ok(json!(hash))
        }
        "eth_getTransactionReceipt" => {
            state.calls.push(method.to_string());
            if state.pending_polls > 0 {
                state.pending_polls -= 1;
                return Ok(Value::Null);
            }
            let hash = params[0]
                .as_str()
                .and_then(|text| H256::from_str(text).ok())
                .unwrap_or_default();
            let receipt = TransactionReceipt {
                transaction_hash: hash,
                block_number: Some(U64::from(1u64)),
                gas_used: Some(state.gas_used),
                status: Some(U64::from(state.receipt_status)),
                ..Default::default()
            };
            Ok(serde_json::to_value(receipt).unwrap())
        }
        "eth_chainId" => {
            state.calls.push(method.to_string());
            Ok(json!(U64::from(11_155_111u64)))
        }
        _ => {
            state.calls.push(method.to_string());
            Err(json!({ "code": -32601, "message": "method not found" }))
        }
    }
}

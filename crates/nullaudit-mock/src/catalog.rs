//! Static tables the sources draw from

use nullaudit_domain::{LogType, Priority};

pub(crate) struct FindingTemplate {
    pub finding_type: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub severity: Priority,
    pub detector: &'static str,
    pub evidence: &'static [&'static str],
    pub snippet: &'static str,
}

pub(crate) const FINDINGS: &[FindingTemplate] = &[
    FindingTemplate {
        finding_type: "reentrancy",
        title: "External call before state update",
        description: "Balance is written after an external call, allowing re-entry into withdraw().",
        severity: Priority::Critical,
        detector: "reentrancy-eth",
        evidence: &[
            "call{value: amount} precedes balances[msg.sender] = 0",
            "withdraw() is public and not guarded by nonReentrant",
        ],
        snippet: "(bool ok, ) = msg.sender.call{value: amount}(\"\");\nbalances[msg.sender] = 0;",
    },
    FindingTemplate {
        finding_type: "tx-origin",
        title: "Authorization through tx.origin",
        description: "Owner check uses tx.origin, which a malicious intermediate contract can satisfy.",
        severity: Priority::High,
        detector: "tx-origin",
        evidence: &["require(tx.origin == owner) in transferOwnership()"],
        snippet: "require(tx.origin == owner, \"not owner\");",
    },
    FindingTemplate {
        finding_type: "unchecked-call",
        title: "Return value of low-level call ignored",
        description: "A failed send leaves the contract believing the payout succeeded.",
        severity: Priority::Medium,
        detector: "unchecked-lowlevel",
        evidence: &["payable(to).send(fee) result discarded"],
        snippet: "payable(to).send(fee);",
    },
    FindingTemplate {
        finding_type: "timestamp-dependence",
        title: "Block timestamp used for randomness",
        description: "Lottery winner derives from block.timestamp, which validators can influence.",
        severity: Priority::Medium,
        detector: "weak-prng",
        evidence: &[
            "uint winner = block.timestamp % players.length",
            "no commit-reveal scheme present",
        ],
        snippet: "uint winner = block.timestamp % players.length;",
    },
    FindingTemplate {
        finding_type: "delegatecall",
        title: "Delegatecall to user-supplied address",
        description: "execute() forwards delegatecall to an arbitrary target, handing over storage.",
        severity: Priority::Critical,
        detector: "controlled-delegatecall",
        evidence: &["target.delegatecall(data) with target from calldata"],
        snippet: "(bool ok, ) = target.delegatecall(data);",
    },
    FindingTemplate {
        finding_type: "access-control",
        title: "Missing access control on mint",
        description: "mint() has no onlyOwner modifier; anyone can inflate supply.",
        severity: Priority::High,
        detector: "unprotected-function",
        evidence: &["function mint(address,uint256) external", "no role check in body"],
        snippet: "function mint(address to, uint256 amount) external {\n    _mint(to, amount);\n}",
    },
    FindingTemplate {
        finding_type: "floating-pragma",
        title: "Floating compiler version",
        description: "pragma allows any 0.8.x compiler, so builds are not reproducible.",
        severity: Priority::Low,
        detector: "solc-version",
        evidence: &["pragma solidity ^0.8.0;"],
        snippet: "pragma solidity ^0.8.0;",
    },
];

pub(crate) const CONTRACTS: &[(&str, &str)] = &[
    ("contracts/Vault.sol", "Vault"),
    ("contracts/TokenSale.sol", "TokenSale"),
    ("contracts/Governor.sol", "Governor"),
    ("contracts/bridge/Bridge.sol", "Bridge"),
    ("contracts/Lottery.sol", "Lottery"),
];

/// (id, name, kind)
pub(crate) const AGENTS: &[(&str, &str, &str)] = &[
    ("agent-static", "Static Analyzer", "static-analysis"),
    ("agent-fuzz", "Fuzzing Engine", "fuzzing"),
    ("agent-symbolic", "Symbolic Executor", "symbolic-execution"),
    ("agent-llm", "Pattern Reviewer", "pattern-review"),
    ("agent-attest", "Attestation Relay", "attestation"),
];

pub(crate) const LOG_MESSAGES: &[(LogType, &str, &str)] = &[
    (LogType::Info, "scanner", "Scan started for contracts/Vault.sol"),
    (LogType::Success, "scanner", "Scan completed with 3 findings"),
    (LogType::Warning, "scanner", "Detector timed out, partial results kept"),
    (LogType::Info, "hitl", "New review task queued"),
    (LogType::Success, "hitl", "Reviewer approved finding"),
    (LogType::Info, "attestation", "Report hash submitted for attestation"),
    (LogType::Success, "attestation", "Attestation confirmed on sepolia"),
    (LogType::Error, "attestation", "RPC endpoint returned 502, retry scheduled"),
    (LogType::Debug, "rate-limiter", "Window reset for client"),
    (LogType::Info, "agent-manager", "Agent heartbeat received"),
    (LogType::Warning, "agent-manager", "Agent heartbeat late by 12s"),
    (LogType::Error, "fuzzer", "Fuzzing campaign crashed on invariant check"),
    (LogType::Debug, "fuzzer", "Corpus grew to 4096 inputs"),
];

pub(crate) const NETWORK: &str = "sepolia";

//! Response status registry
//!
//! Nodes answer every request with a small integer status. The same code space
//! is used for precheck answers (did the node accept the request for
//! processing) and for consensus receipts (what happened to the transaction).
//!
//! Construction from a raw code is strict: a code outside the registry means
//! the SDK and the network disagree on the protocol version, which is reported
//! as [`Error::UnknownStatus`](crate::Error::UnknownStatus). Display of a raw
//! code is lenient and falls back to `UNKNOWN (<code>)`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! statuses {
    ($($(#[$doc:meta])* $variant:ident = $code:literal => $name:literal,)+) => {
        /// Status code returned by a node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(i32)]
        #[non_exhaustive]
        pub enum Status {
            $($(#[$doc])* $variant = $code,)+
        }

        impl Status {
            /// Every status in the registry, in code order.
            pub const ALL: &'static [Status] = &[$(Status::$variant,)+];

            /// Wire code
            pub fn code(self) -> i32 {
                self as i32
            }

            /// Stable upper-case name used in logs and error messages
            pub fn name(self) -> &'static str {
                match self {
                    $(Status::$variant => $name,)+
                }
            }

            fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Status::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

statuses! {
    /// The transaction passed the precheck validations
    Ok = 0 => "OK",
    InvalidTransaction = 1 => "INVALID_TRANSACTION",
    PayerAccountNotFound = 2 => "PAYER_ACCOUNT_NOT_FOUND",
    InvalidNodeAccount = 3 => "INVALID_NODE_ACCOUNT",
    TransactionExpired = 4 => "TRANSACTION_EXPIRED",
    InvalidTransactionStart = 5 => "INVALID_TRANSACTION_START",
    InvalidTransactionDuration = 6 => "INVALID_TRANSACTION_DURATION",
    InvalidSignature = 7 => "INVALID_SIGNATURE",
    MemoTooLong = 8 => "MEMO_TOO_LONG",
    InsufficientTxFee = 9 => "INSUFFICIENT_TX_FEE",
    InsufficientPayerBalance = 10 => "INSUFFICIENT_PAYER_BALANCE",
    DuplicateTransaction = 11 => "DUPLICATE_TRANSACTION",
    /// The node is too busy to handle the request right now
    Busy = 12 => "BUSY",
    NotSupported = 13 => "NOT_SUPPORTED",
    InvalidFileId = 14 => "INVALID_FILE_ID",
    InvalidAccountId = 15 => "INVALID_ACCOUNT_ID",
    InvalidContractId = 16 => "INVALID_CONTRACT_ID",
    InvalidTransactionId = 17 => "INVALID_TRANSACTION_ID",
    /// The node has not seen consensus for the transaction yet
    ReceiptNotFound = 18 => "RECEIPT_NOT_FOUND",
    RecordNotFound = 19 => "RECORD_NOT_FOUND",
    InvalidSolidityId = 20 => "INVALID_SOLIDITY_ID",
    /// Outcome not known yet
    Unknown = 21 => "UNKNOWN",
    /// The transaction reached consensus and succeeded
    Success = 22 => "SUCCESS",
    FailInvalid = 23 => "FAIL_INVALID",
    FailFee = 24 => "FAIL_FEE",
    FailBalance = 25 => "FAIL_BALANCE",
    KeyRequired = 26 => "KEY_REQUIRED",
    BadEncoding = 27 => "BAD_ENCODING",
    InsufficientAccountBalance = 28 => "INSUFFICIENT_ACCOUNT_BALANCE",
    InvalidSolidityAddress = 29 => "INVALID_SOLIDITY_ADDRESS",
    InsufficientGas = 30 => "INSUFFICIENT_GAS",
    ContractSizeLimitExceeded = 31 => "CONTRACT_SIZE_LIMIT_EXCEEDED",
    LocalCallModificationException = 32 => "LOCAL_CALL_MODIFICATION_EXCEPTION",
    ContractRevertExecuted = 33 => "CONTRACT_REVERT_EXECUTED",
    ContractExecutionException = 34 => "CONTRACT_EXECUTION_EXCEPTION",
    InvalidReceivingNodeAccount = 35 => "INVALID_RECEIVING_NODE_ACCOUNT",
    MissingQueryHeader = 36 => "MISSING_QUERY_HEADER",
    AccountUpdateFailed = 37 => "ACCOUNT_UPDATE_FAILED",
    InvalidKeyEncoding = 38 => "INVALID_KEY_ENCODING",
    NullSolidityAddress = 39 => "NULL_SOLIDITY_ADDRESS",
    ContractUpdateFailed = 40 => "CONTRACT_UPDATE_FAILED",
    InvalidQueryHeader = 41 => "INVALID_QUERY_HEADER",
    InvalidFeeSubmitted = 42 => "INVALID_FEE_SUBMITTED",
    InvalidPayerSignature = 43 => "INVALID_PAYER_SIGNATURE",
    KeyNotProvided = 44 => "KEY_NOT_PROVIDED",
    InvalidExpirationTime = 45 => "INVALID_EXPIRATION_TIME",
    NoWaclKey = 46 => "NO_WACL_KEY",
    FileContentEmpty = 47 => "FILE_CONTENT_EMPTY",
    InvalidAccountAmounts = 48 => "INVALID_ACCOUNT_AMOUNTS",
    EmptyTransactionBody = 49 => "EMPTY_TRANSACTION_BODY",
    InvalidTransactionBody = 50 => "INVALID_TRANSACTION_BODY",
    InvalidSignatureTypeMismatchingKey = 51 => "INVALID_SIGNATURE_TYPE_MISMATCHING_KEY",
    InvalidSignatureCountMismatchingKey = 52 => "INVALID_SIGNATURE_COUNT_MISMATCHING_KEY",
    EmptyLiveHashBody = 53 => "EMPTY_LIVE_HASH_BODY",
    EmptyLiveHash = 54 => "EMPTY_LIVE_HASH",
    EmptyLiveHashKeys = 55 => "EMPTY_LIVE_HASH_KEYS",
    InvalidLiveHashSize = 56 => "INVALID_LIVE_HASH_SIZE",
    EmptyQueryBody = 57 => "EMPTY_QUERY_BODY",
    EmptyLiveHashQuery = 58 => "EMPTY_LIVE_HASH_QUERY",
    LiveHashNotFound = 59 => "LIVE_HASH_NOT_FOUND",
    AccountIdDoesNotExist = 60 => "ACCOUNT_ID_DOES_NOT_EXIST",
    LiveHashAlreadyExists = 61 => "LIVE_HASH_ALREADY_EXISTS",
    InvalidFileWacl = 62 => "INVALID_FILE_WACL",
    SerializationFailed = 63 => "SERIALIZATION_FAILED",
    TransactionOversize = 64 => "TRANSACTION_OVERSIZE",
    TransactionTooManyLayers = 65 => "TRANSACTION_TOO_MANY_LAYERS",
    ContractDeleted = 66 => "CONTRACT_DELETED",
    /// The node is up but not yet participating in consensus
    PlatformNotActive = 67 => "PLATFORM_NOT_ACTIVE",
    KeyPrefixMismatch = 68 => "KEY_PREFIX_MISMATCH",
    PlatformTransactionNotCreated = 69 => "PLATFORM_TRANSACTION_NOT_CREATED",
    InvalidRenewalPeriod = 70 => "INVALID_RENEWAL_PERIOD",
    InvalidPayerAccountId = 71 => "INVALID_PAYER_ACCOUNT_ID",
    AccountDeleted = 72 => "ACCOUNT_DELETED",
    FileDeleted = 73 => "FILE_DELETED",
    AccountRepeatedInAccountAmounts = 74 => "ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS",
    SettingNegativeAccountBalance = 75 => "SETTING_NEGATIVE_ACCOUNT_BALANCE",
    ObtainerRequired = 76 => "OBTAINER_REQUIRED",
    ObtainerSameContractId = 77 => "OBTAINER_SAME_CONTRACT_ID",
    ObtainerDoesNotExist = 78 => "OBTAINER_DOES_NOT_EXIST",
    ModifyingImmutableContract = 79 => "MODIFYING_IMMUTABLE_CONTRACT",
    FileSystemException = 80 => "FILE_SYSTEM_EXCEPTION",
    AutorenewDurationNotInRange = 81 => "AUTORENEW_DURATION_NOT_IN_RANGE",
    ErrorDecodingBytestring = 82 => "ERROR_DECODING_BYTESTRING",
    ContractFileEmpty = 83 => "CONTRACT_FILE_EMPTY",
    ContractBytecodeEmpty = 84 => "CONTRACT_BYTECODE_EMPTY",
    InvalidInitialBalance = 85 => "INVALID_INITIAL_BALANCE",
    InvalidReceiveRecordThreshold = 86 => "INVALID_RECEIVE_RECORD_THRESHOLD",
    InvalidSendRecordThreshold = 87 => "INVALID_SEND_RECORD_THRESHOLD",
    AccountIsNotGenesisAccount = 88 => "ACCOUNT_IS_NOT_GENESIS_ACCOUNT",
    PayerAccountUnauthorized = 89 => "PAYER_ACCOUNT_UNAUTHORIZED",
    InvalidFreezeTransactionBody = 90 => "INVALID_FREEZE_TRANSACTION_BODY",
    FreezeTransactionBodyNotFound = 91 => "FREEZE_TRANSACTION_BODY_NOT_FOUND",
    TransferListSizeLimitExceeded = 92 => "TRANSFER_LIST_SIZE_LIMIT_EXCEEDED",
    ResultSizeLimitExceeded = 93 => "RESULT_SIZE_LIMIT_EXCEEDED",
    NotSpecialAccount = 94 => "NOT_SPECIAL_ACCOUNT",
    ContractNegativeGas = 95 => "CONTRACT_NEGATIVE_GAS",
    ContractNegativeValue = 96 => "CONTRACT_NEGATIVE_VALUE",
    InvalidFeeFile = 97 => "INVALID_FEE_FILE",
    InvalidExchangeRateFile = 98 => "INVALID_EXCHANGE_RATE_FILE",
    InsufficientLocalCallGas = 99 => "INSUFFICIENT_LOCAL_CALL_GAS",
    EntityNotAllowedToDelete = 100 => "ENTITY_NOT_ALLOWED_TO_DELETE",
    AuthorizationFailed = 101 => "AUTHORIZATION_FAILED",
    FileUploadedProtoInvalid = 102 => "FILE_UPLOADED_PROTO_INVALID",
    FileUploadedProtoNotSavedToDisk = 103 => "FILE_UPLOADED_PROTO_NOT_SAVED_TO_DISK",
    /// Legacy success code for partial fee schedule uploads
    FeeScheduleFilePartUploaded = 104 => "FEE_SCHEDULE_FILE_PART_UPLOADED",
    ExchangeRateChangeLimitExceeded = 105 => "EXCHANGE_RATE_CHANGE_LIMIT_EXCEEDED",
    MaxContractStorageExceeded = 106 => "MAX_CONTRACT_STORAGE_EXCEEDED",
    TransferAccountSameAsDeleteAccount = 107 => "TRANSFER_ACCOUNT_SAME_AS_DELETE_ACCOUNT",
    TotalLedgerBalanceInvalid = 108 => "TOTAL_LEDGER_BALANCE_INVALID",
    ExpirationReductionNotAllowed = 110 => "EXPIRATION_REDUCTION_NOT_ALLOWED",
    MaxGasLimitExceeded = 111 => "MAX_GAS_LIMIT_EXCEEDED",
    MaxFileSizeExceeded = 112 => "MAX_FILE_SIZE_EXCEEDED",
    ReceiverSigRequired = 113 => "RECEIVER_SIG_REQUIRED",
    InvalidTopicId = 150 => "INVALID_TOPIC_ID",
    InvalidAdminKey = 155 => "INVALID_ADMIN_KEY",
    InvalidSubmitKey = 156 => "INVALID_SUBMIT_KEY",
    Unauthorized = 157 => "UNAUTHORIZED",
    InvalidTopicMessage = 158 => "INVALID_TOPIC_MESSAGE",
    InvalidAutorenewAccount = 159 => "INVALID_AUTORENEW_ACCOUNT",
    AutorenewAccountNotAllowed = 160 => "AUTORENEW_ACCOUNT_NOT_ALLOWED",
    TopicExpired = 162 => "TOPIC_EXPIRED",
    InvalidChunkNumber = 163 => "INVALID_CHUNK_NUMBER",
    InvalidChunkTransactionId = 164 => "INVALID_CHUNK_TRANSACTION_ID",
    AccountFrozenForToken = 165 => "ACCOUNT_FROZEN_FOR_TOKEN",
    TokensPerAccountLimitExceeded = 166 => "TOKENS_PER_ACCOUNT_LIMIT_EXCEEDED",
    InvalidTokenId = 167 => "INVALID_TOKEN_ID",
    InvalidTokenDecimals = 168 => "INVALID_TOKEN_DECIMALS",
    InvalidTokenInitialSupply = 169 => "INVALID_TOKEN_INITIAL_SUPPLY",
    InvalidTreasuryAccountForToken = 170 => "INVALID_TREASURY_ACCOUNT_FOR_TOKEN",
    InvalidTokenSymbol = 171 => "INVALID_TOKEN_SYMBOL",
    TokenHasNoFreezeKey = 172 => "TOKEN_HAS_NO_FREEZE_KEY",
    TransfersNotZeroSumForToken = 173 => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
    MissingTokenSymbol = 174 => "MISSING_TOKEN_SYMBOL",
    TokenSymbolTooLong = 175 => "TOKEN_SYMBOL_TOO_LONG",
    AccountKycNotGrantedForToken = 176 => "ACCOUNT_KYC_NOT_GRANTED_FOR_TOKEN",
    TokenHasNoKycKey = 177 => "TOKEN_HAS_NO_KYC_KEY",
    InsufficientTokenBalance = 178 => "INSUFFICIENT_TOKEN_BALANCE",
    TokenWasDeleted = 179 => "TOKEN_WAS_DELETED",
    TokenHasNoSupplyKey = 180 => "TOKEN_HAS_NO_SUPPLY_KEY",
    TokenHasNoWipeKey = 181 => "TOKEN_HAS_NO_WIPE_KEY",
    InvalidTokenMintAmount = 182 => "INVALID_TOKEN_MINT_AMOUNT",
    InvalidTokenBurnAmount = 183 => "INVALID_TOKEN_BURN_AMOUNT",
    TokenNotAssociatedToAccount = 184 => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
    CannotWipeTokenTreasuryAccount = 185 => "CANNOT_WIPE_TOKEN_TREASURY_ACCOUNT",
    InvalidKycKey = 186 => "INVALID_KYC_KEY",
    InvalidWipeKey = 187 => "INVALID_WIPE_KEY",
    InvalidFreezeKey = 188 => "INVALID_FREEZE_KEY",
    InvalidSupplyKey = 189 => "INVALID_SUPPLY_KEY",
    MissingTokenName = 190 => "MISSING_TOKEN_NAME",
    TokenNameTooLong = 191 => "TOKEN_NAME_TOO_LONG",
    InvalidWipingAmount = 192 => "INVALID_WIPING_AMOUNT",
    TokenIsImmutable = 193 => "TOKEN_IS_IMMUTABLE",
    TokenAlreadyAssociatedToAccount = 194 => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
    TransactionRequiresZeroTokenBalances = 195 => "TRANSACTION_REQUIRES_ZERO_TOKEN_BALANCES",
    AccountIsTreasury = 196 => "ACCOUNT_IS_TREASURY",
    TokenIdRepeatedInTokenList = 197 => "TOKEN_ID_REPEATED_IN_TOKEN_LIST",
    TokenTransferListSizeLimitExceeded = 198 => "TOKEN_TRANSFER_LIST_SIZE_LIMIT_EXCEEDED",
    EmptyTokenTransferBody = 199 => "EMPTY_TOKEN_TRANSFER_BODY",
    EmptyTokenTransferAccountAmounts = 200 => "EMPTY_TOKEN_TRANSFER_ACCOUNT_AMOUNTS",
    InvalidScheduleId = 201 => "INVALID_SCHEDULE_ID",
    ScheduleIsImmutable = 202 => "SCHEDULE_IS_IMMUTABLE",
    InvalidSchedulePayerId = 203 => "INVALID_SCHEDULE_PAYER_ID",
    InvalidScheduleAccountId = 204 => "INVALID_SCHEDULE_ACCOUNT_ID",
    NoNewValidSignatures = 205 => "NO_NEW_VALID_SIGNATURES",
    UnresolvableRequiredSigners = 206 => "UNRESOLVABLE_REQUIRED_SIGNERS",
    ScheduledTransactionNotInWhitelist = 207 => "SCHEDULED_TRANSACTION_NOT_IN_WHITELIST",
    SomeSignaturesWereInvalid = 208 => "SOME_SIGNATURES_WERE_INVALID",
    TransactionIdFieldNotAllowed = 209 => "TRANSACTION_ID_FIELD_NOT_ALLOWED",
    IdenticalScheduleAlreadyCreated = 210 => "IDENTICAL_SCHEDULE_ALREADY_CREATED",
    InvalidZeroByteInString = 211 => "INVALID_ZERO_BYTE_IN_STRING",
    ScheduleAlreadyDeleted = 212 => "SCHEDULE_ALREADY_DELETED",
    ScheduleAlreadyExecuted = 213 => "SCHEDULE_ALREADY_EXECUTED",
    MessageSizeTooLarge = 214 => "MESSAGE_SIZE_TOO_LARGE",
    /// The network shed load at consensus; the transaction id will never be processed
    ThrottledAtConsensus = 366 => "THROTTLED_AT_CONSENSUS",
}

/// What to do with a precheck answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecheckDisposition {
    /// Accepted for processing
    Accepted,
    /// Transient condition, try again (possibly on another node)
    Retry,
    /// Rejected
    Rejected,
}

/// What to do with a receipt status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptDisposition {
    /// Consensus reached and the transaction succeeded
    Success,
    /// Consensus not final yet, poll again
    Pending,
    /// Network-wide backpressure, resubmit under a new transaction id
    Congestion,
    /// Consensus reached and the transaction failed
    Failure,
}

impl Status {
    /// Name of a raw code, or `UNKNOWN (<code>)` for codes outside the registry
    pub fn describe_code(code: i32) -> String {
        match Status::from_code(code) {
            Some(status) => status.name().to_string(),
            None => format!("UNKNOWN ({})", code),
        }
    }

    /// Busy, unknown or platform-not-active precheck answers
    pub fn is_retryable_precheck(self) -> bool {
        matches!(self, Status::Busy | Status::Unknown | Status::PlatformNotActive)
    }

    /// Success and its legacy alias
    pub fn is_success_receipt(self) -> bool {
        matches!(self, Status::Success | Status::FeeScheduleFilePartUploaded)
    }

    /// Receipt statuses meaning consensus is not final yet
    pub fn is_retryable_receipt(self) -> bool {
        matches!(self, Status::Busy | Status::Unknown | Status::ReceiptNotFound)
    }

    /// Network-wide congestion signalled at consensus
    pub fn is_congestion(self) -> bool {
        self == Status::ThrottledAtConsensus
    }

    /// Classify a precheck answer
    pub fn precheck_disposition(self) -> PrecheckDisposition {
        if self == Status::Ok {
            PrecheckDisposition::Accepted
        } else if self.is_retryable_precheck() {
            PrecheckDisposition::Retry
        } else {
            PrecheckDisposition::Rejected
        }
    }

    /// Classify a receipt status
    pub fn receipt_disposition(self) -> ReceiptDisposition {
        if self.is_success_receipt() {
            ReceiptDisposition::Success
        } else if self.is_retryable_receipt() {
            ReceiptDisposition::Pending
        } else if self.is_congestion() {
            ReceiptDisposition::Congestion
        } else {
            ReceiptDisposition::Failure
        }
    }
}

impl TryFrom<i32> for Status {
    type Error = crate::Error;

    fn try_from(code: i32) -> crate::Result<Self> {
        Status::from_code(code).ok_or(crate::Error::UnknownStatus(code))
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_codes() {
        assert_eq!(Status::try_from(0).unwrap(), Status::Ok);
        assert_eq!(Status::try_from(22).unwrap(), Status::Success);
        assert_eq!(Status::try_from(366).unwrap(), Status::ThrottledAtConsensus);
        assert_eq!(Status::Busy.code(), 12);
    }

    #[test]
    fn test_lookup_unknown_code_fails() {
        assert!(matches!(
            Status::try_from(109),
            Err(crate::Error::UnknownStatus(109))
        ));
        assert!(matches!(
            Status::try_from(-1),
            Err(crate::Error::UnknownStatus(-1))
        ));
    }

    #[test]
    fn test_describe_code_is_lenient() {
        assert_eq!(Status::describe_code(22), "SUCCESS");
        assert_eq!(Status::describe_code(9999), "UNKNOWN (9999)");
    }

    #[test]
    fn test_registry_codes_are_unique_and_ordered() {
        for pair in Status::ALL.windows(2) {
            assert!(pair[0].code() < pair[1].code(), "{} >= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_precheck_classification() {
        assert_eq!(Status::Ok.precheck_disposition(), PrecheckDisposition::Accepted);
        assert_eq!(Status::Busy.precheck_disposition(), PrecheckDisposition::Retry);
        assert_eq!(Status::Unknown.precheck_disposition(), PrecheckDisposition::Retry);
        assert_eq!(
            Status::PlatformNotActive.precheck_disposition(),
            PrecheckDisposition::Retry
        );
        assert_eq!(
            Status::InvalidSignature.precheck_disposition(),
            PrecheckDisposition::Rejected
        );
    }

    #[test]
    fn test_receipt_classification() {
        assert_eq!(Status::Success.receipt_disposition(), ReceiptDisposition::Success);
        assert_eq!(
            Status::FeeScheduleFilePartUploaded.receipt_disposition(),
            ReceiptDisposition::Success
        );
        assert_eq!(Status::Busy.receipt_disposition(), ReceiptDisposition::Pending);
        assert_eq!(Status::Unknown.receipt_disposition(), ReceiptDisposition::Pending);
        assert_eq!(
            Status::ReceiptNotFound.receipt_disposition(),
            ReceiptDisposition::Pending
        );
        assert_eq!(
            Status::ThrottledAtConsensus.receipt_disposition(),
            ReceiptDisposition::Congestion
        );
        assert_eq!(
            Status::InsufficientPayerBalance.receipt_disposition(),
            ReceiptDisposition::Failure
        );
    }
}
